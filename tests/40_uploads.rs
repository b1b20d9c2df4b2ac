mod common;

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    StatusCode,
};
use serde_json::Value;
use uuid::Uuid;

use mini_blog_api::database::models::{NewPost, NewUser, Post, PostChanges, PostWithAuthor, User};
use mini_blog_api::database::{BlogStore, DatabaseError, MemoryStore};
use mini_blog_api::filter::PostQuery;

use common::{create_post, register, spawn_server, spawn_server_with_store, unique_email, PASSWORD};

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot-really-a-png";

fn image_part(bytes: Vec<u8>, file_name: &str, mime: &str) -> Result<Part> {
    Ok(Part::bytes(bytes).file_name(file_name.to_string()).mime_str(mime)?)
}

fn post_form(image: Part) -> Form {
    Form::new()
        .text("title", "Illustrated")
        .text("content", "A post with a picture")
        .part("image", image)
}

#[tokio::test]
async fn registration_image_is_stored_and_served() -> Result<()> {
    let server = spawn_server().await?;

    let form = Form::new()
        .text("name", "Pixel")
        .text("email", unique_email("pixel"))
        .text("password", PASSWORD)
        .part("image", image_part(PNG_BYTES.to_vec(), "avatar.PNG", "image/png")?);

    let res = server
        .client
        .post(server.url("/api/auth/register"))
        .multipart(form)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = res.json().await?;
    let image = body["data"]["image"].as_str().context("image path")?.to_string();
    assert!(image.starts_with("/uploads/users/image_"), "unexpected path {}", image);
    assert!(image.ends_with(".png"));

    let res = server.client.get(server.url(&image)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(&res.bytes().await?[..], PNG_BYTES);
    Ok(())
}

#[tokio::test]
async fn disallowed_extension_is_rejected() -> Result<()> {
    let server = spawn_server().await?;
    let account = register(&server, "Uploader").await?;

    let res = server
        .client
        .post(server.url("/api/posts"))
        .bearer_auth(&account.access_token)
        .multipart(post_form(image_part(vec![1, 2, 3], "anim.gif", "image/gif")?))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Only .jpg, .jpeg, .png, .svg files are allowed!");
    Ok(())
}

#[tokio::test]
async fn non_image_mime_is_rejected() -> Result<()> {
    let server = spawn_server().await?;
    let account = register(&server, "Uploader").await?;

    let res = server
        .client
        .post(server.url("/api/posts"))
        .bearer_auth(&account.access_token)
        .multipart(post_form(image_part(b"hello".to_vec(), "notes.png", "text/plain")?))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Only image files are allowed!");
    Ok(())
}

#[tokio::test]
async fn oversized_image_is_rejected() -> Result<()> {
    let server = spawn_server().await?;
    let account = register(&server, "Uploader").await?;
    let too_big = vec![0u8; 7 * 1024 * 1024 + 1];

    let res = server
        .client
        .post(server.url("/api/posts"))
        .bearer_auth(&account.access_token)
        .multipart(post_form(image_part(too_big, "huge.jpg", "image/jpeg")?))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    Ok(())
}

#[tokio::test]
async fn post_image_can_be_added_on_update() -> Result<()> {
    let server = spawn_server().await?;
    let account = register(&server, "Uploader").await?;
    let post = create_post(&server, &account, "Plain post", "No picture yet").await?;
    let url = server.url(&format!("/api/posts/{}", post["id"].as_str().context("post id")?));

    let form = Form::new().part("image", image_part(b"<svg/>".to_vec(), "cover.svg", "image/svg+xml")?);
    let res = server
        .client
        .put(&url)
        .bearer_auth(&account.access_token)
        .multipart(form)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    let image = body["data"]["image"].as_str().context("image path")?;
    assert!(image.starts_with("/uploads/posts/image_"));
    assert!(image.ends_with(".svg"));
    assert_eq!(body["data"]["title"], "Plain post");

    let stored = server.upload_dir.join(image.trim_start_matches("/uploads/"));
    assert!(stored.exists());
    Ok(())
}

/// Never reports an existing email, so duplicates are only caught by the insert itself,
/// as when two registrations race.
struct LateDuplicateStore(MemoryStore);

#[async_trait]
impl BlogStore for LateDuplicateStore {
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        self.0.create_user(user).await
    }

    async fn find_user_by_email(&self, _email: &str) -> Result<Option<User>, DatabaseError> {
        Ok(None)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        self.0.find_user_by_id(id).await
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, DatabaseError> {
        self.0.create_post(post).await
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, DatabaseError> {
        self.0.find_post(id).await
    }

    async fn find_post_with_author(&self, id: Uuid) -> Result<Option<PostWithAuthor>, DatabaseError> {
        self.0.find_post_with_author(id).await
    }

    async fn list_posts(&self, query: PostQuery) -> Result<Vec<PostWithAuthor>, DatabaseError> {
        self.0.list_posts(query).await
    }

    async fn count_posts(&self) -> Result<i64, DatabaseError> {
        self.0.count_posts().await
    }

    async fn posts_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, DatabaseError> {
        self.0.posts_by_author(author_id).await
    }

    async fn update_post(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, DatabaseError> {
        self.0.update_post(id, changes).await
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.0.delete_post(id).await
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.0.health_check().await
    }
}

fn stored_user_images(server: &common::TestServer) -> Result<usize> {
    let dir = server.upload_dir.join("users");
    if !dir.exists() {
        return Ok(0);
    }
    Ok(std::fs::read_dir(dir)?.count())
}

#[tokio::test]
async fn image_is_discarded_when_the_insert_hits_a_duplicate_email() -> Result<()> {
    let server = spawn_server_with_store(Arc::new(LateDuplicateStore(MemoryStore::new()))).await?;
    let email = unique_email("racer");

    let signup = |name: &'static str| -> Result<Form> {
        Ok(Form::new()
            .text("name", name)
            .text("email", email.clone())
            .text("password", PASSWORD)
            .part("image", image_part(PNG_BYTES.to_vec(), "avatar.png", "image/png")?))
    };

    let res = server
        .client
        .post(server.url("/api/auth/register"))
        .multipart(signup("First")?)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(stored_user_images(&server)?, 1);

    let res = server
        .client
        .post(server.url("/api/auth/register"))
        .multipart(signup("Second")?)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "User already exists with this email.");

    assert_eq!(stored_user_images(&server)?, 1);
    Ok(())
}

#[tokio::test]
async fn missing_upload_returns_enveloped_404() -> Result<()> {
    let server = spawn_server().await?;

    let res = server
        .client
        .get(server.url("/uploads/users/image_0_deadbeef.png"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body: Value = res.json().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "API route not found");
    assert!(body["data"].is_null());
    Ok(())
}
