//! Content-hash-addressed upload store.
//!
//! Files land under the store root in a directory chosen by extension
//! (`picture/`, `video/`, `other/`), named by their MD5 content hash so the
//! same bytes are only ever written once.

use std::path::{Path, PathBuf};

use md5::{Digest, Md5};
use thiserror::Error;

use crate::config::UploadConfig;

/// Subdirectory for image files.
const PICTURE_DIR: &str = "picture";
/// Subdirectory for video files.
const VIDEO_DIR: &str = "video";
/// Subdirectory for everything else.
const OTHER_DIR: &str = "other";

const PICTURE_EXTENSIONS: &[&str] = &["jpg", "png", "jpeg", "gif", "bmp"];
const VIDEO_EXTENSIONS: &[&str] = &[
    "avi", "wmv", "mpg", "mpeg", "mpe", "mov", "rm", "ram", "swf", "mp4", "rmvb", "asf", "divx",
    "vob",
];

/// Errors from the upload store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A file that has been written to the store.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Hex MD5 of the file content.
    pub hash: String,
    /// Path relative to the store root.
    pub relative_path: String,
}

/// Filesystem store for uploaded files.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
    base_url: String,
}

impl UploadStore {
    /// Create a store from the loaded configuration.
    #[must_use]
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            root: config.root.clone(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Create the classification directories under the store root.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if a directory cannot be created.
    pub async fn ensure_dirs(&self) -> Result<(), StorageError> {
        for dir in [PICTURE_DIR, VIDEO_DIR, OTHER_DIR] {
            tokio::fs::create_dir_all(self.root.join(dir)).await?;
        }
        Ok(())
    }

    /// Write `bytes` into the store under a name derived from `file_name`'s
    /// extension and the content hash.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the file cannot be written.
    pub async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<StoredFile, StorageError> {
        let hash = content_hash(bytes);
        let relative_path = relative_path_for(file_name, &hash);

        let target = self.root.join(&relative_path);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, bytes).await?;

        Ok(StoredFile {
            hash,
            relative_path,
        })
    }

    /// The public URL for a stored relative path.
    #[must_use]
    pub fn public_url(&self, relative_path: &str) -> String {
        format!("{}/{}", self.base_url, relative_path)
    }
}

/// Hex MD5 of a byte slice.
#[must_use]
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Classification directory for a file extension (without the dot).
#[must_use]
pub fn classify(extension: &str) -> &'static str {
    let ext = extension.to_ascii_lowercase();
    if PICTURE_EXTENSIONS.contains(&ext.as_str()) {
        PICTURE_DIR
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        VIDEO_DIR
    } else {
        OTHER_DIR
    }
}

/// Store-relative path for a file name and its content hash.
fn relative_path_for(file_name: &str, hash: &str) -> String {
    match Path::new(file_name).extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}/{}.{}", classify(ext), hash, ext.to_ascii_lowercase()),
        None => format!("{OTHER_DIR}/{hash}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_extensions() {
        assert_eq!(classify("jpg"), "picture");
        assert_eq!(classify("PNG"), "picture");
        assert_eq!(classify("mp4"), "video");
        assert_eq!(classify("MOV"), "video");
        assert_eq!(classify("pdf"), "other");
        assert_eq!(classify(""), "other");
    }

    #[test]
    fn test_content_hash_is_stable_md5() {
        // Well-known MD5 of the empty input.
        assert_eq!(content_hash(b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(content_hash(b"abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_relative_path_for() {
        assert_eq!(
            relative_path_for("photo.JPG", "cafe"),
            "picture/cafe.jpg"
        );
        assert_eq!(relative_path_for("clip.mp4", "beef"), "video/beef.mp4");
        assert_eq!(relative_path_for("notes.txt", "f00d"), "other/f00d.txt");
        assert_eq!(relative_path_for("README", "1234"), "other/1234");
    }

    #[test]
    fn test_public_url_joins_cleanly() {
        let store = UploadStore::new(&UploadConfig {
            root: PathBuf::from("files"),
            base_url: "http://127.0.0.1:8080/".to_owned(),
        });
        assert_eq!(
            store.public_url("picture/cafe.jpg"),
            "http://127.0.0.1:8080/picture/cafe.jpg"
        );
    }

    #[tokio::test]
    async fn test_save_and_dedupe_path() {
        let dir = std::env::temp_dir().join(format!("storekeep-store-{}", std::process::id()));
        let store = UploadStore::new(&UploadConfig {
            root: dir.clone(),
            base_url: "http://127.0.0.1:8080".to_owned(),
        });
        store.ensure_dirs().await.unwrap();

        let stored = store.save("photo.jpg", b"not really a jpeg").await.unwrap();
        assert!(stored.relative_path.starts_with("picture/"));
        assert!(dir.join(&stored.relative_path).exists());

        // Same bytes, same name: same hash, same path.
        let again = store.save("photo.jpg", b"not really a jpeg").await.unwrap();
        assert_eq!(again.hash, stored.hash);
        assert_eq!(again.relative_path, stored.relative_path);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
