#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header::SET_COOKIE, Response, StatusCode};
use serde_json::{json, Value};

use mini_blog_api::config::{AppConfig, StoreBackend};
use mini_blog_api::database::{BlogStore, MemoryStore};
use mini_blog_api::{app, AppState};

pub const PASSWORD: &str = "Secret123!";

/// A server on its own port and upload directory, backed by a fresh memory store.
pub struct TestServer {
    pub base_url: String,
    pub upload_dir: PathBuf,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

pub fn test_config(upload_dir: PathBuf) -> AppConfig {
    let mut config = AppConfig::development();
    config.database.backend = StoreBackend::Memory;
    config.security.bcrypt_cost = 4;
    config.uploads.dir = upload_dir;
    config
}

/// Each tokio::test has its own runtime, so every test serves its own router.
pub async fn spawn_server() -> Result<TestServer> {
    spawn_server_with_store(Arc::new(MemoryStore::new())).await
}

pub async fn spawn_server_with_store(store: Arc<dyn BlogStore>) -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let upload_dir = std::env::temp_dir().join(format!("blog-test-uploads-{}", port));

    let state = AppState::new(test_config(upload_dir.clone()), store);
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test port")?;

    tokio::spawn(async move {
        let _ = axum::serve(listener, app(state)).await;
    });

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    Ok(TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        upload_dir,
        client,
    })
}

pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, uuid::Uuid::new_v4().simple())
}

/// `refresh_token=<value>` pair from a response's `Set-Cookie`, ready for a `Cookie` header.
pub fn refresh_cookie(res: &Response) -> Option<String> {
    res.headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .find(|pair| pair.starts_with("refresh_token="))
        .map(str::to_string)
}

pub struct Account {
    pub id: String,
    pub email: String,
    pub access_token: String,
    pub cookie: String,
}

pub async fn register(server: &TestServer, name: &str) -> Result<Account> {
    let email = unique_email(&name.to_lowercase());
    let res = server
        .client
        .post(server.url("/api/auth/register"))
        .json(&json!({ "name": name, "email": email, "password": PASSWORD }))
        .send()
        .await?;

    anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());
    let cookie = refresh_cookie(&res).context("register did not set the refresh cookie")?;
    let body: Value = res.json().await?;

    Ok(Account {
        id: body["data"]["id"].as_str().unwrap_or_default().to_string(),
        email,
        access_token: body["data"]["access_token"].as_str().unwrap_or_default().to_string(),
        cookie,
    })
}

/// Create a post and return its `data` object.
pub async fn create_post(server: &TestServer, account: &Account, title: &str, content: &str) -> Result<Value> {
    let res = server
        .client
        .post(server.url("/api/posts"))
        .bearer_auth(&account.access_token)
        .json(&json!({ "title": title, "content": content }))
        .send()
        .await?;

    anyhow::ensure!(res.status() == StatusCode::CREATED, "create failed: {}", res.status());
    let body: Value = res.json().await?;
    Ok(body["data"].clone())
}
