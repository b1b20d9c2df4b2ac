use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::auth::AuthUser;
use super::validate_id::PostId;
use crate::database::models::Post;
use crate::error::ApiError;
use crate::state::AppState;

/// The post the authenticated user is allowed to modify
#[derive(Clone, Debug)]
pub struct OwnedPost(pub Post);

/// Loads the post named by the path and requires the caller to be its author.
/// Must run after `jwt_auth_middleware` and `validate_post_id`.
pub async fn post_owner_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = *request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized("Invalid token format"))?;

    let PostId(post_id) = *request
        .extensions()
        .get::<PostId>()
        .ok_or_else(|| ApiError::bad_request("Invalid id format"))?;

    let post = state
        .store
        .find_post(post_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    if post.author_id != auth_user.user_id {
        tracing::warn!(
            "User {} attempted to modify post {} owned by {}",
            auth_user.user_id,
            post.id,
            post.author_id
        );
        return Err(ApiError::forbidden("You can only modify your own posts"));
    }

    request.extensions_mut().insert(OwnedPost(post));
    Ok(next.run(request).await)
}
