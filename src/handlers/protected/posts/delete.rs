// handlers/protected/posts/delete.rs - DELETE /api/posts/:id handler

use axum::extract::{Extension, State};
use serde_json::{json, Value};
use tracing::info;

use crate::docs::{ErrorEnvelope, MessageData};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, OwnedPost};
use crate::state::AppState;

/// DELETE /api/posts/:id - remove a post the caller owns
#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    tag = "Posts",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Post id (UUID)")),
    responses(
        (status = 200, description = "Post deleted", body = MessageData),
        (status = 401, description = "Missing or invalid access token", body = ErrorEnvelope),
        (status = 403, description = "Caller is not the author", body = ErrorEnvelope),
        (status = 404, description = "Post not found", body = ErrorEnvelope)
    )
)]
pub async fn post_delete(
    State(state): State<AppState>,
    Extension(OwnedPost(post)): Extension<OwnedPost>,
) -> ApiResult<Value> {
    if !state.store.delete_post(post.id).await? {
        return Err(ApiError::not_found("Post not found"));
    }
    info!("Post {} deleted", post.id);

    Ok(ApiResponse::success(json!({ "message": "Post deleted successfully" })))
}
