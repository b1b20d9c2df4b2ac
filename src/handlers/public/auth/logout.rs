// handlers/public/auth/logout.rs - POST /api/auth/logout handler

use axum::{extract::State, http::header::SET_COOKIE, response::IntoResponse};
use serde_json::json;

use super::cookie::clear_refresh_cookie;
use crate::docs::MessageData;
use crate::middleware::ApiResponse;
use crate::state::AppState;

/// POST /api/auth/logout - expire the refresh cookie
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Authentication",
    responses((status = 200, description = "Refresh cookie cleared", body = MessageData))
)]
pub async fn logout_post(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(SET_COOKIE, clear_refresh_cookie(&state.config.security))],
        ApiResponse::success(json!({ "message": "Logged out successfully" })),
    )
}
