pub mod client;
pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "blog")]
#[command(about = "Blog CLI - Command-line client for the Mini Blog API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, env = "BLOG_SERVER", help = "Server URL (saved for later commands)")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Authentication and token management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Read and manage posts")]
    Posts {
        #[command(subcommand)]
        cmd: commands::posts::PostCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    let mut session = config::load_session()?;
    if let Some(server) = cli.server {
        if server != session.server {
            session.server = server;
            config::save_session(&session)?;
        }
    }

    let result = match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &mut session, output_format.clone()).await,
        Commands::Posts { cmd } => commands::posts::handle(cmd, &session, output_format.clone()).await,
    };

    if let Err(e) = &result {
        utils::output_error(&output_format, &e.to_string())?;
    }
    result
}
