// handlers/public/posts/get.rs - GET /api/posts/:id handler

use axum::extract::{Path, State};

use crate::database::models::PostWithAuthor;
use crate::docs::ErrorEnvelope;
use crate::error::ApiError;
use crate::middleware::{validate_id::parse_id, ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/posts/:id - a single post with its author
#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    tag = "Posts",
    params(("id" = String, Path, description = "Post id (UUID)")),
    responses(
        (status = 200, description = "The post", body = PostWithAuthor),
        (status = 400, description = "Invalid id format", body = ErrorEnvelope),
        (status = 404, description = "Post not found", body = ErrorEnvelope)
    )
)]
pub async fn post_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<PostWithAuthor> {
    let id = parse_id(&id)?;

    let post = state
        .store
        .find_post_with_author(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    Ok(ApiResponse::success(post))
}
