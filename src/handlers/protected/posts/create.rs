// handlers/protected/posts/create.rs - POST /api/posts handler

use axum::extract::{Extension, State};
use tracing::info;

use crate::database::models::{NewPost, PostWithAuthor};
use crate::docs::{ErrorEnvelope, PostForm};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::uploads::{check_image, save_image, FormInput, UploadKind};
use crate::validation::{validate_post_content, validate_post_title};

/// POST /api/posts - create a post authored by the caller
///
/// Body: `title`, `content` and an optional `image` file, as JSON or
/// multipart/form-data.
#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "Posts",
    security(("bearer_auth" = [])),
    request_body(content = PostForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Post created", body = PostWithAuthor),
        (status = 400, description = "Missing or invalid fields or bad image", body = ErrorEnvelope),
        (status = 401, description = "Missing or invalid access token", body = ErrorEnvelope),
        (status = 413, description = "Image larger than 7 MB", body = ErrorEnvelope)
    )
)]
pub async fn post_create(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    mut input: FormInput,
) -> ApiResult<PostWithAuthor> {
    let image = input
        .take_image()
        .map(|file| check_image(file, &state.config.uploads))
        .transpose()?;

    let (Some(title), Some(content)) = (input.text("title"), input.text("content")) else {
        return Err(ApiError::bad_request("Title and Content are required"));
    };
    validate_post_title(title)?;
    validate_post_content(content)?;

    let image = match image {
        Some(image) => save_image(&state.config.uploads, UploadKind::Posts, image).await?,
        None => String::new(),
    };

    let post = state
        .store
        .create_post(NewPost {
            author_id: auth_user.user_id,
            title: title.to_string(),
            content: content.to_string(),
            image,
        })
        .await?;
    info!("User {} created post {}", auth_user.user_id, post.id);

    let populated = state
        .store
        .find_post_with_author(post.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    Ok(ApiResponse::created(populated))
}
