use clap::Parser;
use mini_blog_api::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = mini_blog_api::cli::run(cli).await {
        if matches!(std::env::var("CLI_VERBOSE").as_deref(), Ok("true") | Ok("1")) {
            eprintln!("{e:?}");
        }
        std::process::exit(1);
    }

    Ok(())
}
