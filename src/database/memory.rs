use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    AuthorSummary, NewPost, NewUser, Post, PostChanges, PostWithAuthor, User,
};
use crate::database::store::BlogStore;
use crate::filter::{PostQuery, SortDirection, SortField, SortKey};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    /// Insertion order doubles as the tiebreaker when sort keys are equal.
    posts: Vec<Post>,
}

/// Process-local store for development and tests.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare(a: &Post, b: &Post, field: SortField) -> Ordering {
    match field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::Title => a.title.cmp(&b.title),
    }
}

fn sorted<'a>(posts: &'a [Post], key: SortKey) -> Vec<&'a Post> {
    let mut indexed: Vec<(usize, &Post)> = posts.iter().enumerate().collect();
    indexed.sort_by(|(ia, a), (ib, b)| {
        let ord = compare(a, b, key.field).then(ia.cmp(ib));
        match key.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    indexed.into_iter().map(|(_, post)| post).collect()
}

fn populate(post: &Post, users: &HashMap<Uuid, User>) -> Option<PostWithAuthor> {
    users
        .get(&post.author_id)
        .map(|author| PostWithAuthor::new(post.clone(), AuthorSummary::from(author)))
}

#[async_trait]
impl BlogStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(DatabaseError::DuplicateEmail);
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            image: user.image,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&post.author_id) {
            return Err(DatabaseError::NotFound("Author not found".to_string()));
        }

        let now = Utc::now();
        let created = Post {
            id: Uuid::new_v4(),
            title: post.title,
            content: post.content,
            author_id: post.author_id,
            image: post.image,
            created_at: now,
            updated_at: now,
        };
        tables.posts.push(created.clone());
        Ok(created)
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn find_post_with_author(&self, id: Uuid) -> Result<Option<PostWithAuthor>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .iter()
            .find(|p| p.id == id)
            .and_then(|p| populate(p, &tables.users)))
    }

    async fn list_posts(&self, query: PostQuery) -> Result<Vec<PostWithAuthor>, DatabaseError> {
        let tables = self.tables.read().await;
        let offset = usize::try_from(query.offset).unwrap_or(0);
        let limit = usize::try_from(query.limit).unwrap_or(0);

        Ok(sorted(&tables.posts, query.sort)
            .into_iter()
            .skip(offset)
            .take(limit)
            .filter_map(|p| populate(p, &tables.users))
            .collect())
    }

    async fn count_posts(&self) -> Result<i64, DatabaseError> {
        Ok(self.tables.read().await.posts.len() as i64)
    }

    async fn posts_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(sorted(&tables.posts, SortKey::default())
            .into_iter()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect())
    }

    async fn update_post(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, DatabaseError> {
        let mut tables = self.tables.write().await;
        Ok(tables.posts.iter_mut().find(|p| p.id == id).map(|post| {
            changes.apply(post);
            post.updated_at = Utc::now();
            post.clone()
        }))
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != id);
        Ok(tables.posts.len() < before)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterOrder;

    async fn seed_user(store: &MemoryStore, email: &str) -> User {
        store
            .create_user(NewUser {
                name: "Writer".into(),
                email: email.into(),
                password_hash: "hash".into(),
                image: String::new(),
            })
            .await
            .unwrap()
    }

    async fn seed_post(store: &MemoryStore, author: Uuid, title: &str) -> Post {
        store
            .create_post(NewPost {
                author_id: author,
                title: title.into(),
                content: "Some content".into(),
                image: String::new(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        seed_user(&store, "dup@example.com").await;

        let second = store
            .create_user(NewUser {
                name: "Other".into(),
                email: "dup@example.com".into(),
                password_hash: "hash".into(),
                image: String::new(),
            })
            .await;
        assert!(matches!(second, Err(DatabaseError::DuplicateEmail)));
        assert_eq!(store.tables.read().await.users.len(), 1);
    }

    #[tokio::test]
    async fn listing_pages_and_sorts() {
        let store = MemoryStore::new();
        let author = seed_user(&store, "a@example.com").await;
        for title in ["Charlie", "Alpha", "Bravo"] {
            seed_post(&store, author.id, title).await;
        }

        let query = PostQuery {
            offset: 0,
            limit: 2,
            sort: FilterOrder::parse(Some("title")).unwrap(),
        };
        let page: Vec<String> = store
            .list_posts(query)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(page, vec!["Alpha", "Bravo"]);

        let newest = store
            .list_posts(PostQuery { offset: 0, limit: 10, sort: SortKey::default() })
            .await
            .unwrap();
        assert_eq!(newest[0].title, "Bravo");
        assert_eq!(newest[0].author.email, "a@example.com");
        assert_eq!(store.count_posts().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn update_keeps_author_and_unspecified_fields() {
        let store = MemoryStore::new();
        let author = seed_user(&store, "b@example.com").await;
        let post = seed_post(&store, author.id, "Before").await;

        let updated = store
            .update_post(
                post.id,
                PostChanges { content: Some("Rewritten body".into()), ..Default::default() },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "Before");
        assert_eq!(updated.content, "Rewritten body");
        assert_eq!(updated.author_id, author.id);
        assert!(updated.updated_at >= post.updated_at);
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_was_removed() {
        let store = MemoryStore::new();
        let author = seed_user(&store, "c@example.com").await;
        let post = seed_post(&store, author.id, "Doomed").await;

        assert!(store.delete_post(post.id).await.unwrap());
        assert!(!store.delete_post(post.id).await.unwrap());
        assert!(store.find_post(post.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn posts_by_author_filters_other_authors() {
        let store = MemoryStore::new();
        let mine = seed_user(&store, "mine@example.com").await;
        let theirs = seed_user(&store, "theirs@example.com").await;
        seed_post(&store, mine.id, "First").await;
        seed_post(&store, theirs.id, "Not mine").await;
        seed_post(&store, mine.id, "Second").await;

        let titles: Vec<String> = store
            .posts_by_author(mine.id)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["Second", "First"]);
    }
}
