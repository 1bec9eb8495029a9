//! # Upload Store
//!
//! Product images on local disk, served back under `/uploads`.
//!
//! ```text
//! POST /api/upload  photo.PNG ──► <upload_dir>/3f2b…-….PNG ──► "/uploads/3f2b…-….PNG"
//! DELETE /api/upload "/uploads/../../etc/passwd" ──► <upload_dir>/passwd (never outside)
//! ```
//!
//! Names are UUID v4 plus the original extension, so concurrent uploads
//! never collide.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use stockroom_core::validation::{image_extension, image_file_name};
use stockroom_core::UPLOADS_PUBLIC_PATH;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Filesystem failures while storing or removing an image.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Upload storage error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        UploadStore {
            dir: dir.into(),
            max_bytes,
        }
    }

    /// Creates the directory (and parents) if missing.
    pub async fn ensure_dir(&self) -> Result<(), UploadError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Writes the image and returns its public URL.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String, UploadError> {
        let name = format!("{}{}", Uuid::new_v4(), image_extension(original_name));
        tokio::fs::write(self.dir.join(&name), bytes).await?;
        debug!(file = %name, bytes = bytes.len(), "Image stored");
        Ok(format!("{UPLOADS_PUBLIC_PATH}/{name}"))
    }

    /// Removes the image an URL points at.
    ///
    /// ## Returns
    /// * `Ok(true)` - File removed
    /// * `Ok(false)` - Nothing to remove (missing file or no usable name)
    /// * `Err(_)` - Any other filesystem failure
    pub async fn delete(&self, image_url: &str) -> Result<bool, UploadError> {
        let Some(name) = image_file_name(image_url) else {
            return Ok(false);
        };
        match tokio::fs::remove_file(self.dir.join(name)).await {
            Ok(()) => {
                debug!(file = %name, "Image deleted");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_keeps_extension_with_unique_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().join("nested/uploads"), 1024);
        store.ensure_dir().await.unwrap();
        store.ensure_dir().await.unwrap();

        let first = store.save("photo.JPG", b"abc").await.unwrap();
        let second = store.save("photo.JPG", b"abc").await.unwrap();
        assert_ne!(first, second);
        assert!(first.starts_with("/uploads/"));
        assert!(first.ends_with(".JPG"));

        let name = image_file_name(&first).unwrap();
        assert_eq!(std::fs::read(store.dir().join(name)).unwrap(), b"abc");
    }

    #[tokio::test]
    async fn test_delete_missing_and_escaping_paths() {
        let root = tempfile::tempdir().unwrap();
        let store = UploadStore::new(root.path().join("uploads"), 1024);
        store.ensure_dir().await.unwrap();

        let url = store.save("a.png", b"x").await.unwrap();
        assert!(store.delete(&url).await.unwrap());
        assert!(!store.delete(&url).await.unwrap());
        assert!(!store.delete("").await.unwrap());
        assert!(!store.delete("/uploads/..").await.unwrap());

        // Only the last component is used, inside the upload dir
        let sibling = root.path().join("keep.png");
        std::fs::write(&sibling, b"keep").unwrap();
        assert!(!store.delete("/uploads/../keep.png").await.unwrap());
        assert!(sibling.exists());
    }
}
