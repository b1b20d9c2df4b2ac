use axum::{
    extract::{DefaultBodyLimit, State},
    handler::HandlerWithoutStateExt,
    http::{header, HeaderValue, Method},
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;

use crate::config::SecurityConfig;
use crate::docs::ApiDoc;
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::{
    jwt_auth_middleware, post_owner_middleware, validate_post_id, ApiResponse, ApiResult,
};
use crate::state::AppState;

/// Headroom over the image limit for the other multipart fields.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let body_limit = state.config.uploads.max_bytes + FORM_OVERHEAD_BYTES;
    let upload_dir = state.config.uploads.dir.clone();
    let cors = cors_layer(&state.config.security);

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api-docs", get(api_docs))
        .route("/api-docs/openapi.json", get(api_docs))
        .nest("/api/auth", auth_routes(&state))
        .nest("/api/posts", post_routes(&state))
        // Stored images
        .nest_service(
            "/uploads",
            ServeDir::new(upload_dir).not_found_service(route_not_found.into_service()),
        )
        .fallback(route_not_found)
        // Global middleware, outermost first
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

fn auth_routes(state: &AppState) -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/register", post(auth::register_post))
        .route("/login", post(auth::login_post))
        .route("/refresh", post(auth::refresh_post))
        .route("/logout", post(auth::logout_post))
        .route(
            "/me",
            get(protected::auth::profile_get).route_layer(middleware::from_fn_with_state(
                state.clone(),
                jwt_auth_middleware,
            )),
        )
}

fn post_routes(state: &AppState) -> Router<AppState> {
    let require_auth = middleware::from_fn_with_state(state.clone(), jwt_auth_middleware);
    let require_owner = middleware::from_fn_with_state(state.clone(), post_owner_middleware);

    Router::new()
        .route(
            "/",
            get(public::posts::posts_list)
                .merge(post(protected::posts::post_create).route_layer(require_auth.clone())),
        )
        // route_layer wraps outward: auth runs first, then id check, then ownership
        .route(
            "/:id",
            get(public::posts::post_get).merge(
                put(protected::posts::post_update)
                    .delete(protected::posts::post_delete)
                    .route_layer(require_owner)
                    .route_layer(middleware::from_fn(validate_post_id))
                    .route_layer(require_auth),
            ),
        )
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

async fn root() -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "name": "Mini Blog API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "auth": "/api/auth/{register,login,refresh,logout,me}",
            "posts": "/api/posts[/:id]",
            "uploads": "/uploads/{users,posts}/:file",
            "health": "/health",
            "docs": "/api-docs",
        }
    })))
}

async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    state.store.health_check().await.map_err(|e| {
        tracing::error!("Health check failed: {}", e);
        ApiError::service_unavailable("Database unavailable")
    })?;

    Ok(ApiResponse::success(json!({
        "status": "ok",
        "timestamp": Utc::now(),
        "database": "ok",
    })))
}

/// Raw OpenAPI document, unwrapped so documentation tools can consume it directly.
async fn api_docs() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn route_not_found() -> impl IntoResponse {
    ApiError::not_found("API route not found")
}
