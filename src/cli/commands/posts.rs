use std::path::PathBuf;

use clap::Subcommand;
use reqwest::Method;

use crate::cli::client::{form_with_image, ApiClient};
use crate::cli::config::Session;
use crate::cli::utils::{output_data, output_success, print_post, print_post_list};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum PostCommands {
    #[command(about = "List posts")]
    List {
        #[arg(long, help = "Page number (starts at 1)")]
        page: Option<u32>,
        #[arg(long, help = "Posts per page")]
        limit: Option<u32>,
        #[arg(long, help = "Sort key, e.g. -createdAt, title, -updatedAt")]
        sort: Option<String>,
    },

    #[command(about = "Show a single post")]
    Get {
        #[arg(help = "Post id")]
        id: String,
    },

    #[command(about = "Create a post")]
    Create {
        #[arg(long, help = "Post title")]
        title: String,
        #[arg(long, help = "Post content")]
        content: String,
        #[arg(long, help = "Cover image (.jpg, .jpeg, .png, .svg)")]
        image: Option<PathBuf>,
    },

    #[command(about = "Update one of your posts")]
    Update {
        #[arg(help = "Post id")]
        id: String,
        #[arg(long, help = "New title")]
        title: Option<String>,
        #[arg(long, help = "New content")]
        content: Option<String>,
        #[arg(long, help = "New cover image")]
        image: Option<PathBuf>,
    },

    #[command(about = "Delete one of your posts")]
    Delete {
        #[arg(help = "Post id")]
        id: String,
    },
}

pub async fn handle(
    cmd: PostCommands,
    session: &Session,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let client = ApiClient::new(&session.server)?;

    match cmd {
        PostCommands::List { page, limit, sort } => {
            let mut query: Vec<(&str, String)> = Vec::new();
            if let Some(page) = page {
                query.push(("page", page.to_string()));
            }
            if let Some(limit) = limit {
                query.push(("limit", limit.to_string()));
            }
            if let Some(sort) = sort {
                query.push(("sort", sort));
            }

            let reply = client
                .send(client.request(Method::GET, "/api/posts").query(&query))
                .await?;
            output_data(&output_format, &reply.data, print_post_list)
        }
        PostCommands::Get { id } => {
            let reply = client
                .send(client.request(Method::GET, &format!("/api/posts/{}", id)))
                .await?;
            output_data(&output_format, &reply.data, print_post)
        }
        PostCommands::Create { title, content, image } => {
            let form = form_with_image(
                &[("title", Some(title.as_str())), ("content", Some(content.as_str()))],
                image.as_deref(),
            )
            .await?;

            let reply = client
                .send(client.authed(Method::POST, "/api/posts", session)?.multipart(form))
                .await?;
            let id = reply.data.get("id").and_then(|v| v.as_str()).unwrap_or_default().to_string();
            output_success(&output_format, &format!("Created post {}", id), Some(reply.data))
        }
        PostCommands::Update { id, title, content, image } => {
            if title.is_none() && content.is_none() && image.is_none() {
                anyhow::bail!("Nothing to update: pass --title, --content or --image");
            }
            let form = form_with_image(
                &[("title", title.as_deref()), ("content", content.as_deref())],
                image.as_deref(),
            )
            .await?;

            let reply = client
                .send(
                    client
                        .authed(Method::PUT, &format!("/api/posts/{}", id), session)?
                        .multipart(form),
                )
                .await?;
            output_success(&output_format, &format!("Updated post {}", id), Some(reply.data))
        }
        PostCommands::Delete { id } => {
            client
                .send(client.authed(Method::DELETE, &format!("/api/posts/{}", id), session)?)
                .await?;
            output_success(&output_format, &format!("Deleted post {}", id), None)
        }
    }
}
