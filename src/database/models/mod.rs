pub mod post;
pub mod user;

pub use post::{NewPost, Post, PostAuthorRow, PostChanges, PostWithAuthor};
pub use user::{AuthorSummary, NewUser, User, UserProfile};
