use anyhow::Context;
use tracing_subscriber::EnvFilter;

use mini_blog_api::config;
use mini_blog_api::database::DatabaseManager;
use mini_blog_api::{app, is_development, uploads, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL and the token secrets
    let _ = dotenvy::dotenv();

    let default_filter = if is_development!() {
        "info,tower_http=debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let config = config::config().clone();
    config.validate().context("invalid configuration")?;
    tracing::info!("Starting Mini Blog API in {:?} mode", config.environment);

    let store = DatabaseManager::connect(&config.database)
        .await
        .context("failed to initialise the store")?;

    uploads::ensure_upload_dirs(&config.uploads)
        .await
        .with_context(|| format!("failed to create {}", config.uploads.dir.display()))?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Mini Blog API listening on http://{}", bind_addr);

    let state = AppState::new(config, store);
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
