// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition under /api/auth and read access to posts. Protected
// handlers live in `handlers::protected` and expect `AuthUser` in the
// request extensions.

pub mod auth;
pub mod posts;
