pub mod form;

use std::path::Path;

use axum::body::Bytes;
use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::config::UploadConfig;

pub use form::FormInput;

pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "svg"];

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("File too large. Maximum size is {} MB", .0 / (1024 * 1024))]
    TooLarge(usize),

    #[error("Only image files are allowed!")]
    NotImage,

    #[error("Only .jpg, .jpeg, .png, .svg files are allowed!")]
    BadExtension,

    #[error("Invalid multipart body: {0}")]
    Multipart(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Which entity an upload belongs to; selects the subdirectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Users,
    Posts,
}

impl UploadKind {
    pub fn dir_name(&self) -> &'static str {
        match self {
            UploadKind::Users => "users",
            UploadKind::Posts => "posts",
        }
    }
}

/// A file part named `image` as received from the client.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// An image that passed the type, extension and size checks.
#[derive(Debug, Clone)]
pub struct CheckedImage {
    extension: String,
    data: Bytes,
}

pub fn check_image(file: ImageFile, uploads: &UploadConfig) -> Result<CheckedImage, UploadError> {
    let is_image = file
        .content_type
        .as_deref()
        .map(|mime| mime.starts_with("image/"))
        .unwrap_or(false);
    if !is_image {
        return Err(UploadError::NotImage);
    }

    let extension = Path::new(&file.file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .ok_or(UploadError::BadExtension)?;

    if file.data.len() > uploads.max_bytes {
        return Err(UploadError::TooLarge(uploads.max_bytes));
    }

    Ok(CheckedImage {
        extension,
        data: file.data,
    })
}

/// Write the image under `<dir>/<kind>/` and return the public `/uploads/...` path.
pub async fn save_image(
    uploads: &UploadConfig,
    kind: UploadKind,
    image: CheckedImage,
) -> Result<String, UploadError> {
    let file_name = format!(
        "image_{}_{}.{}",
        Utc::now().timestamp_millis(),
        &Uuid::new_v4().simple().to_string()[..8],
        image.extension
    );

    let dir = uploads.dir.join(kind.dir_name());
    tokio::fs::create_dir_all(&dir).await?;
    tokio::fs::write(dir.join(&file_name), &image.data).await?;

    tracing::debug!("Stored {} upload {}", kind.dir_name(), file_name);
    Ok(format!("/uploads/{}/{}", kind.dir_name(), file_name))
}

/// Remove a previously saved image given its public `/uploads/...` path.
/// Paths outside the upload tree are ignored.
pub async fn discard_image(uploads: &UploadConfig, public_path: &str) {
    let Some(relative) = public_path.strip_prefix("/uploads/") else {
        return;
    };
    if relative.split('/').any(|segment| segment == "..") {
        return;
    }

    if let Err(e) = tokio::fs::remove_file(uploads.dir.join(relative)).await {
        tracing::warn!("Failed to discard upload {}: {}", public_path, e);
    }
}

/// Create the upload root and its per-kind subdirectories.
pub async fn ensure_upload_dirs(uploads: &UploadConfig) -> std::io::Result<()> {
    for kind in [UploadKind::Users, UploadKind::Posts] {
        tokio::fs::create_dir_all(uploads.dir.join(kind.dir_name())).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn file(name: &str, mime: &str, len: usize) -> ImageFile {
        ImageFile {
            file_name: name.to_string(),
            content_type: Some(mime.to_string()),
            data: Bytes::from(vec![0u8; len]),
        }
    }

    fn uploads() -> UploadConfig {
        AppConfig::development().uploads
    }

    #[test]
    fn accepts_allowed_extensions_case_insensitively() {
        let checked = check_image(file("Avatar.PNG", "image/png", 16), &uploads()).unwrap();
        assert_eq!(checked.extension, "png");
        assert!(check_image(file("logo.svg", "image/svg+xml", 16), &uploads()).is_ok());
    }

    #[test]
    fn rejects_non_images_and_other_extensions() {
        assert!(matches!(
            check_image(file("notes.txt", "text/plain", 16), &uploads()),
            Err(UploadError::NotImage)
        ));
        assert!(matches!(
            check_image(file("anim.gif", "image/gif", 16), &uploads()),
            Err(UploadError::BadExtension)
        ));
        assert!(matches!(
            check_image(file("noext", "image/png", 16), &uploads()),
            Err(UploadError::BadExtension)
        ));
    }

    #[test]
    fn rejects_oversized_files() {
        let mut config = uploads();
        config.max_bytes = 8;
        let err = check_image(file("big.jpg", "image/jpeg", 9), &config).unwrap_err();
        assert!(matches!(err, UploadError::TooLarge(8)));
    }

    #[tokio::test]
    async fn saved_images_get_public_paths() {
        let mut config = uploads();
        config.dir = std::env::temp_dir().join(format!("blog-uploads-{}", Uuid::new_v4()));

        let checked = check_image(file("photo.jpeg", "image/jpeg", 4), &config).unwrap();
        let public = save_image(&config, UploadKind::Posts, checked).await.unwrap();

        assert!(public.starts_with("/uploads/posts/image_"));
        assert!(public.ends_with(".jpeg"));
        let stored = config.dir.join(public.trim_start_matches("/uploads/"));
        assert!(stored.exists());

        let _ = std::fs::remove_dir_all(&config.dir);
    }

    #[tokio::test]
    async fn discarded_images_are_removed_from_disk() {
        let mut config = uploads();
        config.dir = std::env::temp_dir().join(format!("blog-uploads-{}", Uuid::new_v4()));

        let checked = check_image(file("avatar.png", "image/png", 4), &config).unwrap();
        let public = save_image(&config, UploadKind::Users, checked).await.unwrap();
        let stored = config.dir.join(public.trim_start_matches("/uploads/"));
        assert!(stored.exists());

        discard_image(&config, &public).await;
        assert!(!stored.exists());

        // Unknown or escaping paths are a no-op
        discard_image(&config, "/uploads/users/../../etc/passwd").await;
        discard_image(&config, "/elsewhere/file.png").await;

        let _ = std::fs::remove_dir_all(&config.dir);
    }
}
