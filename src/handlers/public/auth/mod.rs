// handlers/public/auth/mod.rs - Public authentication handlers
//
// Token acquisition endpoints. The refresh token only ever travels in the
// httpOnly `refresh_token` cookie; access tokens are returned in the body.

pub mod cookie;
pub mod login;    // POST /api/auth/login
pub mod logout;   // POST /api/auth/logout
pub mod refresh;  // POST /api/auth/refresh
pub mod register; // POST /api/auth/register

pub use login::login_post;
pub use logout::logout_post;
pub use refresh::refresh_post;
pub use register::register_post;
