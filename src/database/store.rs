use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewPost, NewUser, Post, PostChanges, PostWithAuthor, User};
use crate::filter::PostQuery;

/// Persistence for users and posts. Every method is a single logical store
/// operation; handlers compose them.
#[async_trait]
pub trait BlogStore: Send + Sync {
    /// Insert a user. Fails with `DatabaseError::DuplicateEmail` if the email is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;

    async fn create_post(&self, post: NewPost) -> Result<Post, DatabaseError>;

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, DatabaseError>;

    async fn find_post_with_author(&self, id: Uuid) -> Result<Option<PostWithAuthor>, DatabaseError>;

    async fn list_posts(&self, query: PostQuery) -> Result<Vec<PostWithAuthor>, DatabaseError>;

    async fn count_posts(&self) -> Result<i64, DatabaseError>;

    /// Posts owned by `author_id`, newest first.
    async fn posts_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, DatabaseError>;

    /// Apply `changes` and bump `updated_at`. Returns `None` if the post is gone.
    async fn update_post(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, DatabaseError>;

    /// Returns whether a row was removed.
    async fn delete_post(&self, id: Uuid) -> Result<bool, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}
