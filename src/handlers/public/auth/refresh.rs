// handlers/public/auth/refresh.rs - POST /api/auth/refresh handler

use axum::{extract::State, http::HeaderMap};
use serde::Serialize;
use utoipa::ToSchema;

use super::cookie::read_refresh_cookie;
use crate::auth::{issue_access_token, validate_jwt, TokenType};
use crate::docs::ErrorEnvelope;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// POST /api/auth/refresh - mint a new access token from the refresh cookie
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = "Authentication",
    params(("refresh_token" = String, Cookie, description = "Refresh token set at login")),
    responses(
        (status = 200, description = "New access token", body = RefreshResponse),
        (status = 401, description = "Refresh token missing, invalid or expired", body = ErrorEnvelope),
        (status = 404, description = "User not found", body = ErrorEnvelope)
    )
)]
pub async fn refresh_post(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<RefreshResponse> {
    let token = read_refresh_cookie(&headers)
        .ok_or_else(|| ApiError::unauthorized("Refresh token not found"))?;

    let claims = validate_jwt(&token, TokenType::Refresh, &state.config.security)
        .map_err(|_| ApiError::unauthorized("Invalid or expired refresh token"))?;

    let user = state
        .store
        .find_user_by_id(claims.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let access_token = issue_access_token(user.id, &state.config.security)?;
    tracing::debug!("Refreshed access token for user {}", user.id);

    Ok(ApiResponse::success(RefreshResponse { access_token }))
}
