// handlers/public/auth/login.rs - POST /api/auth/login handler

use axum::{extract::State, http::header::SET_COOKIE, response::IntoResponse};
use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use super::cookie::refresh_cookie;
use crate::auth::{issue_token_pair, password::verify_password};
use crate::database::models::AuthorSummary;
use crate::docs::{ErrorEnvelope, LoginForm};
use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::state::AppState;
use crate::uploads::FormInput;

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: AuthorSummary,
}

/// POST /api/auth/login - verify credentials and issue a new token pair
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body(content = LoginForm, content_type = "application/json"),
    responses(
        (status = 200, description = "Logged in; `refresh_token` cookie set", body = LoginResponse),
        (status = 400, description = "Email or password missing", body = ErrorEnvelope),
        (status = 401, description = "Invalid password", body = ErrorEnvelope),
        (status = 404, description = "User not found", body = ErrorEnvelope)
    )
)]
pub async fn login_post(
    State(state): State<AppState>,
    input: FormInput,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(email), Some(password)) = (input.text("email"), input.raw("password")) else {
        return Err(ApiError::bad_request("Email and password are required"));
    };

    let user = state
        .store
        .find_user_by_email(email)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if !verify_password(password.to_string(), user.password_hash.clone()).await? {
        warn!("Failed login for user {}", user.id);
        return Err(ApiError::unauthorized("Invalid password"));
    }

    let tokens = issue_token_pair(user.id, &state.config.security)?;
    info!("User {} logged in", user.id);

    Ok((
        [(SET_COOKIE, refresh_cookie(&tokens.refresh_token, &state.config.security))],
        ApiResponse::success(LoginResponse {
            access_token: tokens.access_token,
            user: AuthorSummary::from(&user),
        }),
    ))
}
