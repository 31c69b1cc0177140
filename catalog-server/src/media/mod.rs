//! Media Store
//!
//! Hash-addressed image files on local disk. The cascade engine treats this
//! as a detached side channel: deletion is idempotent and best-effort, a
//! failed file removal is logged and skipped, and referential cleanup in
//! the database never waits on it.

use std::path::PathBuf;
use tokio::fs;

#[derive(Clone, Debug)]
pub struct MediaStore {
    /// Image directory: {work_dir}/images/
    images_dir: PathBuf,
}

impl MediaStore {
    pub fn new(images_dir: PathBuf) -> Self {
        Self { images_dir }
    }

    /// Path of the file backing a media hash
    pub fn image_path(&self, hash: &str) -> PathBuf {
        self.images_dir.join(format!("{}.jpg", hash))
    }

    /// Check whether a media hash has a backing file
    pub fn image_exists(&self, hash: &str) -> bool {
        self.image_path(hash).exists()
    }

    /// Delete the file behind a media hash.
    ///
    /// Idempotent: a missing file (or an empty hash) is not an error.
    /// IO failures are logged and swallowed. Returns whether a file was
    /// actually removed.
    pub async fn delete_image(&self, hash: &str) -> bool {
        if hash.is_empty() {
            return false;
        }
        let file_path = self.image_path(hash);
        if !file_path.exists() {
            return false;
        }
        match fs::remove_file(&file_path).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(hash = %hash, error = %e, "Failed to delete image file");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path().to_path_buf());

        std::fs::write(store.image_path("abc123"), b"jpeg").unwrap();
        assert!(store.image_exists("abc123"));

        assert!(store.delete_image("abc123").await);
        assert!(!store.image_exists("abc123"));
        // second call on a gone file is fine
        assert!(!store.delete_image("abc123").await);
        // never-existed and empty hashes are fine too
        assert!(!store.delete_image("nope").await);
        assert!(!store.delete_image("").await);
    }
}
