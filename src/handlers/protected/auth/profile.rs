// handlers/protected/auth/profile.rs - GET /api/auth/me handler

use axum::extract::{Extension, State};

use crate::database::models::UserProfile;
use crate::docs::ErrorEnvelope;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /api/auth/me - the authenticated user with their posts, newest first
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile with owned posts", body = UserProfile),
        (status = 401, description = "Missing or invalid access token", body = ErrorEnvelope),
        (status = 404, description = "User not found", body = ErrorEnvelope)
    )
)]
pub async fn profile_get(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<UserProfile> {
    let user = state
        .store
        .find_user_by_id(auth_user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let posts = state.store.posts_by_author(user.id).await?;

    Ok(ApiResponse::success(UserProfile::new(user, posts)))
}
