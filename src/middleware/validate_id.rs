use axum::{
    extract::{Path, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::error::ApiError;

/// Post id from the path, already checked to be a UUID
#[derive(Clone, Copy, Debug)]
pub struct PostId(pub Uuid);

pub fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request("Invalid id format"))
}

/// Rejects `/:id` routes whose id is not a UUID before any store access
pub async fn validate_post_id(
    Path(id): Path<String>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;
    request.extensions_mut().insert(PostId(id));
    Ok(next.run(request).await)
}
