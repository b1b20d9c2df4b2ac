// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Middleware: `jwt_auth_middleware` on every route here; post mutations also
// run `validate_post_id` and `post_owner_middleware`, which leaves the loaded
// post in the request as `OwnedPost`.

pub mod auth;
pub mod posts;
