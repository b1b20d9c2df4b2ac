// handlers/public/posts/mod.rs - Read-only post endpoints

pub mod get;  // GET /api/posts/:id
pub mod list; // GET /api/posts

pub use get::post_get;
pub use list::posts_list;
