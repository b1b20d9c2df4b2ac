// handlers/protected/posts/update.rs - PUT /api/posts/:id handler

use axum::extract::{Extension, State};
use tracing::info;

use crate::database::models::{PostChanges, PostWithAuthor};
use crate::docs::{ErrorEnvelope, PostUpdateForm};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, OwnedPost};
use crate::state::AppState;
use crate::uploads::{check_image, save_image, FormInput, UploadKind};
use crate::validation::{validate_post_content, validate_post_title};

/// PUT /api/posts/:id - partial update of a post the caller owns
///
/// Only non-blank `title`/`content` and a supplied `image` overwrite the
/// stored values. The author never changes.
#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    tag = "Posts",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Post id (UUID)")),
    request_body(content = PostUpdateForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated post", body = PostWithAuthor),
        (status = 400, description = "Invalid id, fields or image", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid access token", body = ErrorEnvelope),
        (status = 403, description = "Caller is not the author", body = ErrorEnvelope),
        (status = 404, description = "Post not found", body = ErrorEnvelope)
    )
)]
pub async fn post_update(
    State(state): State<AppState>,
    Extension(OwnedPost(post)): Extension<OwnedPost>,
    mut input: FormInput,
) -> ApiResult<PostWithAuthor> {
    let image = input
        .take_image()
        .map(|file| check_image(file, &state.config.uploads))
        .transpose()?;

    let title = input.text("title");
    let content = input.text("content");
    if let Some(title) = title {
        validate_post_title(title)?;
    }
    if let Some(content) = content {
        validate_post_content(content)?;
    }

    let image = match image {
        Some(image) => Some(save_image(&state.config.uploads, UploadKind::Posts, image).await?),
        None => None,
    };

    let changes = PostChanges {
        title: title.map(str::to_string),
        content: content.map(str::to_string),
        image,
    };

    if !changes.is_empty() {
        state
            .store
            .update_post(post.id, changes)
            .await?
            .ok_or_else(|| ApiError::not_found("Post not found"))?;
        info!("Post {} updated by its author", post.id);
    }

    let populated = state
        .store
        .find_post_with_author(post.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    Ok(ApiResponse::success(populated))
}
