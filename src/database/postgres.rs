use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    NewPost, NewUser, Post, PostAuthorRow, PostChanges, PostWithAuthor, User,
};
use crate::database::store::BlogStore;
use crate::filter::{FilterOrder, PostQuery};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        image TEXT NOT NULL DEFAULT '',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS users_email_key ON users (email)",
    r#"
    CREATE TABLE IF NOT EXISTS posts (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        author_id UUID NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        image TEXT NOT NULL DEFAULT '',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS posts_author_id_idx ON posts (author_id)",
    "CREATE INDEX IF NOT EXISTS posts_created_at_idx ON posts (created_at DESC)",
];

const USER_COLUMNS: &str = "id, name, email, password_hash, image, created_at, updated_at";
const POST_COLUMNS: &str = "id, title, content, author_id, image, created_at, updated_at";
const POST_AUTHOR_SELECT: &str = r#"
    SELECT p.id, p.title, p.content, p.image, p.author_id, p.created_at, p.updated_at,
           u.name AS author_name, u.email AS author_email, u.image AS author_image
    FROM posts p
    JOIN users u ON u.id = p.author_id
"#;

/// Postgres-backed store over a shared sqlx pool.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create tables and indexes if they do not exist yet.
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Database schema ready");
        Ok(())
    }
}

#[async_trait]
impl BlogStore for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (id, name, email, password_hash, image) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.image)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_user_insert)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, DatabaseError> {
        let sql = format!(
            "INSERT INTO posts (id, title, content, author_id, image) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            POST_COLUMNS
        );

        let created = sqlx::query_as::<_, Post>(&sql)
            .bind(Uuid::new_v4())
            .bind(&post.title)
            .bind(&post.content)
            .bind(post.author_id)
            .bind(&post.image)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, DatabaseError> {
        let sql = format!("SELECT {} FROM posts WHERE id = $1", POST_COLUMNS);
        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn find_post_with_author(&self, id: Uuid) -> Result<Option<PostWithAuthor>, DatabaseError> {
        let sql = format!("{} WHERE p.id = $1", POST_AUTHOR_SELECT);
        let row = sqlx::query_as::<_, PostAuthorRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(PostWithAuthor::from))
    }

    async fn list_posts(&self, query: PostQuery) -> Result<Vec<PostWithAuthor>, DatabaseError> {
        let sql = format!(
            "{} {} LIMIT $1 OFFSET $2",
            POST_AUTHOR_SELECT,
            FilterOrder::generate(&query.sort)
        );
        debug!("list_posts: {}", sql.trim());

        let rows = sqlx::query_as::<_, PostAuthorRow>(&sql)
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(PostWithAuthor::from).collect())
    }

    async fn count_posts(&self) -> Result<i64, DatabaseError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn posts_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM posts WHERE author_id = $1 ORDER BY created_at DESC, id DESC",
            POST_COLUMNS
        );
        let posts = sqlx::query_as::<_, Post>(&sql)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(posts)
    }

    async fn update_post(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, DatabaseError> {
        let sql = format!(
            r#"
            UPDATE posts
            SET title = COALESCE($2, title),
                content = COALESCE($3, content),
                image = COALESCE($4, image),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            POST_COLUMNS
        );

        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .bind(changes.title)
            .bind(changes.content)
            .bind(changes.image)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
