// handlers/public/auth/register.rs - POST /api/auth/register handler

use axum::{extract::State, http::header::SET_COOKIE, response::IntoResponse};
use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use super::cookie::refresh_cookie;
use crate::auth::{issue_token_pair, password::hash_password};
use crate::database::models::NewUser;
use crate::docs::{ErrorEnvelope, RegisterForm};
use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::state::AppState;
use crate::uploads::{check_image, discard_image, save_image, FormInput, UploadKind};
use crate::validation::{validate_email, validate_name, validate_password};

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: String,
    pub access_token: String,
}

/// POST /api/auth/register - create an account and start a session
///
/// Accepts `name`, `email`, `password` and an optional `image` file as JSON or
/// multipart/form-data. Sets the refresh cookie and returns the access token.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    request_body(content = RegisterForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "User registered; `refresh_token` cookie set", body = RegisterResponse),
        (status = 400, description = "Missing or invalid fields, bad image or duplicate email", body = ErrorEnvelope),
        (status = 413, description = "Image larger than 7 MB", body = ErrorEnvelope)
    )
)]
pub async fn register_post(
    State(state): State<AppState>,
    mut input: FormInput,
) -> Result<impl IntoResponse, ApiError> {
    let image = input
        .take_image()
        .map(|file| check_image(file, &state.config.uploads))
        .transpose()?;

    let (Some(name), Some(email), Some(password)) =
        (input.text("name"), input.text("email"), input.raw("password"))
    else {
        return Err(ApiError::bad_request("Email, Name and password are required"));
    };

    validate_name(name)?;
    validate_email(email)?;
    validate_password(password)?;

    if state.store.find_user_by_email(email).await?.is_some() {
        warn!("Registration rejected: email already in use");
        return Err(ApiError::bad_request("User already exists with this email."));
    }

    let password_hash =
        hash_password(password.to_string(), state.config.security.bcrypt_cost).await?;

    let image = match image {
        Some(image) => save_image(&state.config.uploads, UploadKind::Users, image).await?,
        None => String::new(),
    };

    let created = state
        .store
        .create_user(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            image: image.clone(),
        })
        .await;

    // A concurrent registration can still win the unique index after the check above
    let user = match created {
        Ok(user) => user,
        Err(err) => {
            if !image.is_empty() {
                discard_image(&state.config.uploads, &image).await;
            }
            return Err(err.into());
        }
    };

    let tokens = issue_token_pair(user.id, &state.config.security)?;
    info!("Registered user {}", user.id);

    Ok((
        [(SET_COOKIE, refresh_cookie(&tokens.refresh_token, &state.config.security))],
        ApiResponse::created(RegisterResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            image: user.image,
            access_token: tokens.access_token,
        }),
    ))
}
