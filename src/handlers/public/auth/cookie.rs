// handlers/public/auth/cookie.rs - refresh token cookie helpers

use axum::http::{header::COOKIE, HeaderMap};

use crate::config::SecurityConfig;

pub const REFRESH_COOKIE: &str = "refresh_token";

/// `Set-Cookie` value carrying the refresh token for `refresh_expiry_days`.
pub fn refresh_cookie(token: &str, security: &SecurityConfig) -> String {
    let max_age = security.refresh_expiry_days * 24 * 60 * 60;
    build_cookie(token, max_age, security.cookie_secure)
}

/// `Set-Cookie` value that expires the refresh token immediately.
pub fn clear_refresh_cookie(security: &SecurityConfig) -> String {
    build_cookie("", 0, security.cookie_secure)
}

fn build_cookie(value: &str, max_age: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; Path=/; Max-Age={}; SameSite=Lax",
        REFRESH_COOKIE, value, max_age
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Value of the `refresh_token` cookie, if the client sent a non-empty one.
pub fn read_refresh_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == REFRESH_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
