pub mod auth;
pub mod ownership;
pub mod response;
pub mod validate_id;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use ownership::{post_owner_middleware, OwnedPost};
pub use response::{ApiResponse, ApiResult};
pub use validate_id::{validate_post_id, PostId};
