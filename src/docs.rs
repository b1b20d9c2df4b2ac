//! OpenAPI document served at `/api-docs`.
//!
//! Success bodies are wrapped as `{message, data, success: true}`; the schemas
//! referenced by each 2xx response describe `data`. Errors use `ErrorEnvelope`.

use serde::Serialize;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use crate::database::models::{AuthorSummary, Post, PostWithAuthor, UserProfile};
use crate::filter::PageInfo;
use crate::handlers::protected;
use crate::handlers::public;

pub const BEARER_SCHEME: &str = "bearer_auth";

/// Error body returned by every failing request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorEnvelope {
    #[schema(example = "Post not found")]
    pub message: String,
    #[schema(value_type = Option<Object>)]
    pub data: Option<serde_json::Value>,
    #[schema(example = false)]
    pub success: bool,
}

/// `data` of logout and delete responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageData {
    #[schema(example = "Post deleted successfully")]
    pub message: String,
}

/// Registration form, sent as multipart/form-data or JSON.
#[derive(Debug, ToSchema)]
pub struct RegisterForm {
    #[schema(example = "John Doe", min_length = 2)]
    pub name: String,
    #[schema(example = "john@example.com")]
    pub email: String,
    #[schema(example = "StrongP@ss123!", min_length = 8)]
    pub password: String,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}

#[derive(Debug, ToSchema)]
pub struct LoginForm {
    #[schema(example = "john@example.com")]
    pub email: String,
    #[schema(example = "StrongP@ss123!")]
    pub password: String,
}

/// New post, sent as multipart/form-data or JSON.
#[derive(Debug, ToSchema)]
pub struct PostForm {
    #[schema(example = "My First Post", min_length = 2)]
    pub title: String,
    #[schema(example = "This is the content of my post.", min_length = 5)]
    pub content: String,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}

/// Partial update; omitted or blank fields keep their stored values.
#[derive(Debug, ToSchema)]
pub struct PostUpdateForm {
    pub title: Option<String>,
    pub content: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                BEARER_SCHEME,
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mini Blog API",
        description = "User registration and login with JWT access/refresh tokens, and posts owned by their authors."
    ),
    paths(
        public::auth::register::register_post,
        public::auth::login::login_post,
        public::auth::refresh::refresh_post,
        public::auth::logout::logout_post,
        protected::auth::profile::profile_get,
        public::posts::list::posts_list,
        public::posts::get::post_get,
        protected::posts::create::post_create,
        protected::posts::update::post_update,
        protected::posts::delete::post_delete,
    ),
    components(schemas(
        AuthorSummary,
        Post,
        PostWithAuthor,
        UserProfile,
        PageInfo,
        public::auth::register::RegisterResponse,
        public::auth::login::LoginResponse,
        public::auth::refresh::RefreshResponse,
        public::posts::list::PostList,
        ErrorEnvelope,
        MessageData,
        RegisterForm,
        LoginForm,
        PostForm,
        PostUpdateForm,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "Authentication", description = "User authentication and session management"),
        (name = "Posts", description = "Blog post management")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for path in [
            "/api/auth/register",
            "/api/auth/login",
            "/api/auth/refresh",
            "/api/auth/logout",
            "/api/auth/me",
            "/api/posts",
            "/api/posts/{id}",
        ] {
            assert!(paths.contains(&path), "{} is missing from {:?}", path, paths);
        }
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key(BEARER_SCHEME));
        assert!(components.schemas.contains_key("PostWithAuthor"));
    }
}
