use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use reqwest::{
    header::{AUTHORIZATION, COOKIE, SET_COOKIE},
    multipart::{Form, Part},
    Method, RequestBuilder, Response,
};
use serde_json::Value;

use crate::cli::config::Session;

const REFRESH_COOKIE: &str = "refresh_token";

/// Decoded `{message, data, success}` reply plus the refresh cookie, if one was set.
#[derive(Debug)]
pub struct ApiReply {
    pub message: String,
    pub data: Value,
    pub refresh_token: Option<String>,
}

/// Thin HTTP client over the blog API.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    /// Request carrying the session's access token.
    pub fn authed(&self, method: Method, path: &str, session: &Session) -> anyhow::Result<RequestBuilder> {
        let token = session
            .access_token
            .as_deref()
            .ok_or_else(|| anyhow!("Not logged in. Run `blog auth login` first"))?;
        Ok(self
            .request(method, path)
            .header(AUTHORIZATION, format!("Bearer {}", token)))
    }

    /// Request carrying the session's refresh cookie.
    pub fn with_refresh_cookie(&self, method: Method, path: &str, session: &Session) -> anyhow::Result<RequestBuilder> {
        let token = session
            .refresh_token
            .as_deref()
            .ok_or_else(|| anyhow!("No refresh token stored. Log in again"))?;
        Ok(self
            .request(method, path)
            .header(COOKIE, format!("{}={}", REFRESH_COOKIE, token)))
    }

    pub async fn send(&self, builder: RequestBuilder) -> anyhow::Result<ApiReply> {
        let response = builder
            .send()
            .await
            .with_context(|| format!("failed to reach {}", self.base_url))?;
        parse_reply(response).await
    }
}

async fn parse_reply(response: Response) -> anyhow::Result<ApiReply> {
    let status = response.status();
    let refresh_token = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(refresh_cookie_value);

    let body: Value = response
        .json()
        .await
        .with_context(|| format!("server returned a non-JSON body ({})", status))?;

    let message = body
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let success = body.get("success").and_then(Value::as_bool).unwrap_or(false);

    if !status.is_success() || !success {
        bail!("{} ({})", message, status.as_u16());
    }

    Ok(ApiReply {
        message,
        data: body.get("data").cloned().unwrap_or(Value::Null),
        refresh_token,
    })
}

/// Token from a `refresh_token=...; HttpOnly; ...` header; `None` for a cleared cookie.
pub fn refresh_cookie_value(set_cookie: &str) -> Option<String> {
    let (name, value) = set_cookie.split(';').next()?.trim().split_once('=')?;
    (name == REFRESH_COOKIE && !value.is_empty()).then(|| value.to_string())
}

/// Multipart form of the supplied text fields plus an optional image file.
pub async fn form_with_image(fields: &[(&str, Option<&str>)], image: Option<&Path>) -> anyhow::Result<Form> {
    let mut form = Form::new();
    for (name, value) in fields {
        if let Some(value) = value {
            form = form.text(name.to_string(), value.to_string());
        }
    }

    if let Some(path) = image {
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("image")
            .to_string();
        let part = Part::bytes(data)
            .file_name(file_name)
            .mime_str(image_mime(path))?;
        form = form.part("image", part);
    }

    Ok(form)
}

fn image_mime(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_refresh_cookie() {
        assert_eq!(
            refresh_cookie_value("refresh_token=abc.def; HttpOnly; Path=/; Max-Age=3888000").as_deref(),
            Some("abc.def")
        );
        assert_eq!(refresh_cookie_value("refresh_token=; HttpOnly; Max-Age=0"), None);
        assert_eq!(refresh_cookie_value("theme=dark"), None);
    }

    #[test]
    fn mime_follows_extension() {
        assert_eq!(image_mime(Path::new("a/b/photo.JPG")), "image/jpeg");
        assert_eq!(image_mime(Path::new("logo.svg")), "image/svg+xml");
        assert_eq!(image_mime(Path::new("notes.txt")), "application/octet-stream");
    }
}
