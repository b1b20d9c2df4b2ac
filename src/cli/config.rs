use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_SERVER: &str = "http://localhost:3000";
const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Everything the CLI remembers between invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub server: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<SessionUser>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            access_token: None,
            refresh_token: None,
            user: None,
            updated_at: None,
        }
    }
}

impl Session {
    pub fn is_logged_in(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn sign_in(&mut self, access_token: String, refresh_token: Option<String>, user: Option<SessionUser>) {
        self.access_token = Some(access_token);
        if refresh_token.is_some() {
            self.refresh_token = refresh_token;
        }
        if user.is_some() {
            self.user = user;
        }
        self.updated_at = Some(Utc::now());
    }

    /// Drop credentials but keep the server selection.
    pub fn sign_out(&mut self) {
        self.access_token = None;
        self.refresh_token = None;
        self.user = None;
        self.updated_at = Some(Utc::now());
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("BLOG_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("blog").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_session() -> anyhow::Result<Session> {
    load_session_from(&get_config_dir()?)
}

pub fn save_session(session: &Session) -> anyhow::Result<()> {
    save_session_to(&get_config_dir()?, session)
}

pub fn load_session_from(config_dir: &Path) -> anyhow::Result<Session> {
    let session_file = config_dir.join(SESSION_FILE);

    if !session_file.exists() {
        return Ok(Session::default());
    }

    let content = fs::read_to_string(session_file)?;
    let session: Session = serde_json::from_str(&content)?;
    Ok(session)
}

pub fn save_session_to(config_dir: &Path, session: &Session) -> anyhow::Result<()> {
    fs::create_dir_all(config_dir)?;
    let content = serde_json::to_string_pretty(session)?;
    fs::write(config_dir.join(SESSION_FILE), content)?;
    Ok(())
}
