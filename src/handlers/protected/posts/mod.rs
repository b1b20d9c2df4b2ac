pub mod create; // POST /api/posts
pub mod delete; // DELETE /api/posts/:id
pub mod update; // PUT /api/posts/:id

pub use create::post_create;
pub use delete::post_delete;
pub use update::post_update;
