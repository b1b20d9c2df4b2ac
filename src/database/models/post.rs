use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::AuthorSummary;

/// A stored post. `author_id` is fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(rename = "author")]
    pub author_id: Uuid,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub image: String,
}

/// Partial update. `None` leaves the stored value untouched. The author is not updatable.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
}

impl PostChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.image.is_none()
    }

    /// Apply onto an in-memory copy, used by stores without SQL.
    pub fn apply(&self, post: &mut Post) {
        if let Some(title) = &self.title {
            post.title = title.clone();
        }
        if let Some(content) = &self.content {
            post.content = content.clone();
        }
        if let Some(image) = &self.image {
            post.image = image.clone();
        }
    }
}

/// A post with its author populated, as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PostWithAuthor {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author: AuthorSummary,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostWithAuthor {
    pub fn new(post: Post, author: AuthorSummary) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            author,
            image: post.image,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Flat row produced by the posts ⨝ users join.
#[derive(Debug, FromRow)]
pub struct PostAuthorRow {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub image: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_name: String,
    pub author_email: String,
    pub author_image: String,
}

impl From<PostAuthorRow> for PostWithAuthor {
    fn from(row: PostAuthorRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            author: AuthorSummary {
                id: row.author_id,
                name: row.author_name,
                email: row.author_email,
                image: row.author_image,
            },
            image: row.image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
