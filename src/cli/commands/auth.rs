use std::path::PathBuf;

use clap::Subcommand;
use reqwest::Method;
use serde_json::{json, Value};

use crate::cli::client::{form_with_image, ApiClient};
use crate::cli::config::{save_session, Session, SessionUser};
use crate::cli::utils::{output_data, output_success, print_user, prompt_if_missing};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Register a new account and log in")]
    Register {
        #[arg(help = "Display name")]
        name: String,
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
        #[arg(long, help = "Profile image (.jpg, .jpeg, .png, .svg)")]
        image: Option<PathBuf>,
    },

    #[command(about = "Login to server")]
    Login {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Get a new access token using the stored refresh token")]
    Refresh,

    #[command(about = "Logout and forget stored tokens")]
    Logout,

    #[command(about = "Show current user and their posts")]
    Me,

    #[command(about = "Show local session state")]
    Status,
}

fn session_user(value: &Value) -> Option<SessionUser> {
    serde_json::from_value(value.clone()).ok()
}

fn access_token(data: &Value) -> anyhow::Result<String> {
    data.get("access_token")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("server response did not include an access token"))
}

pub async fn handle(
    cmd: AuthCommands,
    session: &mut Session,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let client = ApiClient::new(&session.server)?;

    match cmd {
        AuthCommands::Register { name, email, password, image } => {
            let password = prompt_if_missing(password, "Password")?;
            let form = form_with_image(
                &[
                    ("name", Some(name.as_str())),
                    ("email", Some(email.as_str())),
                    ("password", Some(password.as_str())),
                ],
                image.as_deref(),
            )
            .await?;

            let reply = client
                .send(client.request(Method::POST, "/api/auth/register").multipart(form))
                .await?;
            session.sign_in(access_token(&reply.data)?, reply.refresh_token, session_user(&reply.data));
            save_session(session)?;

            output_success(&output_format, &format!("Registered and logged in as {}", email), Some(reply.data))
        }
        AuthCommands::Login { email, password } => {
            let password = prompt_if_missing(password, "Password")?;
            let reply = client
                .send(
                    client
                        .request(Method::POST, "/api/auth/login")
                        .json(&json!({ "email": email, "password": password })),
                )
                .await?;

            let user = reply.data.get("user").and_then(session_user);
            session.sign_in(access_token(&reply.data)?, reply.refresh_token, user);
            save_session(session)?;

            output_success(&output_format, &format!("Logged in as {}", email), Some(reply.data))
        }
        AuthCommands::Refresh => {
            let reply = client
                .send(client.with_refresh_cookie(Method::POST, "/api/auth/refresh", session)?)
                .await?;
            session.sign_in(access_token(&reply.data)?, reply.refresh_token, None);
            save_session(session)?;

            output_success(&output_format, "Access token refreshed", None)
        }
        AuthCommands::Logout => {
            // The server only clears the cookie; local state is what matters here
            if let Err(e) = client.send(client.request(Method::POST, "/api/auth/logout")).await {
                tracing::debug!("Logout request failed: {}", e);
            }
            session.sign_out();
            save_session(session)?;

            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Me => {
            let reply = client
                .send(client.authed(Method::GET, "/api/auth/me", session)?)
                .await?;

            output_data(&output_format, &reply.data, |user| {
                print_user(user);
                let count = user.get("posts").and_then(Value::as_array).map_or(0, Vec::len);
                println!("  {} post(s)", count);
            })
        }
        AuthCommands::Status => {
            let data = json!({
                "server": session.server,
                "logged_in": session.is_logged_in(),
                "user": session.user,
                "updated_at": session.updated_at,
            });

            output_data(&output_format, &data, |_| {
                println!("Server: {}", session.server);
                match &session.user {
                    Some(user) if session.is_logged_in() => {
                        println!("Logged in as {} <{}>", user.name, user.email)
                    }
                    _ if session.is_logged_in() => println!("Logged in"),
                    _ => println!("Not logged in"),
                }
            })
        }
    }
}
