//! Object storage for uploaded files.
//!
//! Files are written under `<root>/<bucket>/<path>` and served from
//! `<public_base_url>/<bucket>/<path>`. Uploads never overwrite an existing
//! object, so every upload needs a fresh name from [`random_object_name`] or
//! [`timestamped_object_name`].

use crate::errors::{Error, Result};
use std::path::{Component, Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};

/// Storage buckets known to the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bucket {
    /// Badge images
    Badges,
    /// Certificate images and templates
    Certificates,
}

impl Bucket {
    /// Bucket name as used in paths and URLs
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Badges => "badges",
            Self::Certificates => "certificates",
        }
    }
}

/// Filesystem-backed bucket store.
#[derive(Clone, Debug)]
pub struct BucketStore {
    root: PathBuf,
    public_base_url: String,
}

impl BucketStore {
    /// Creates a store rooted at `root`, publishing files under `public_base_url`.
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Directory the buckets live in
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Public URL for an object.
    #[must_use]
    pub fn public_url(&self, bucket: Bucket, path: &str) -> String {
        format!("{}/{}/{}", self.public_base_url, bucket.name(), path)
    }

    /// Writes `bytes` to `bucket/path` and returns the object's public URL.
    ///
    /// Fails with [`Error::Storage`] when the path escapes the bucket or the
    /// object already exists.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload(&self, bucket: Bucket, path: &str, bytes: &[u8]) -> Result<String> {
        let relative = Path::new(path);
        let is_plain = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if path.is_empty() || !is_plain {
            return Err(Error::Storage {
                message: format!("Invalid object path '{path}'"),
            });
        }

        let target = self.root.join(bucket.name()).join(relative);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .await
            .map_err(|e| Error::Storage {
                message: format!("Failed to create {}/{path}: {e}", bucket.name()),
            })?;
        file.write_all(bytes).await?;
        file.flush().await?;

        debug!("Stored {} bytes at {:?}", bytes.len(), target);
        Ok(self.public_url(bucket, path))
    }
}

/// Extension of an uploaded file name, `bin` when it has none.
fn extension_of(file_name: &str) -> &str {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .unwrap_or("bin")
}

/// `<folder>/<random uuid>.<ext>`
#[must_use]
pub fn random_object_name(folder: &str, file_name: &str) -> String {
    format!("{folder}/{}.{}", uuid::Uuid::new_v4(), extension_of(file_name))
}

/// `<folder>/<unix millis>-<short random>.<ext>`, sortable by upload time.
#[must_use]
pub fn timestamped_object_name(folder: &str, file_name: &str) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{folder}/{}-{}.{}",
        chrono::Utc::now().timestamp_millis(),
        &suffix[..8],
        extension_of(file_name)
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::temp_store;

    #[tokio::test]
    async fn test_upload_writes_file_and_returns_public_url() -> Result<()> {
        let store = temp_store("upload");
        let url = store
            .upload(Bucket::Badges, "badges/knot.png", b"png-bytes")
            .await?;

        assert_eq!(url, "http://localhost/storage/badges/badges/knot.png");
        let written = tokio::fs::read(store.root().join("badges/badges/knot.png")).await?;
        assert_eq!(written, b"png-bytes");
        Ok(())
    }

    #[tokio::test]
    async fn test_upload_refuses_to_overwrite() -> Result<()> {
        let store = temp_store("overwrite");
        store.upload(Bucket::Certificates, "a/b.pdf", b"1").await?;

        let second = store.upload(Bucket::Certificates, "a/b.pdf", b"2").await;
        assert!(matches!(second, Err(Error::Storage { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_upload_rejects_escaping_paths() {
        let store = temp_store("escape");
        let result = store.upload(Bucket::Badges, "../outside.png", b"x").await;
        assert!(matches!(result, Err(Error::Storage { .. })));

        let result = store.upload(Bucket::Badges, "/etc/passwd", b"x").await;
        assert!(matches!(result, Err(Error::Storage { .. })));
    }

    #[test]
    fn test_object_names_keep_extension() {
        let random = random_object_name("badges", "photo.jpeg");
        assert!(random.starts_with("badges/"));
        assert!(random.ends_with(".jpeg"));
        assert_ne!(random, random_object_name("badges", "photo.jpeg"));

        let stamped = timestamped_object_name("certificate-templates", "template");
        assert!(stamped.starts_with("certificate-templates/"));
        assert!(stamped.ends_with(".bin"));
    }
}
