//! Course image storage.
//!
//! Uploads are kept behind the [`FileStore`] trait so the backend can be
//! swapped (local filesystem today, an object store later) without touching
//! course logic. A store accepts raw bytes and hands back a public URL that
//! is persisted on the course row.

use std::fmt;
use std::path::PathBuf;

use tokio::fs;

/// Abstract store for uploaded files. `save` returns the public URL for
/// the stored object.
pub trait FileStore: Send + Sync {
    fn save<'a>(
        &'a self,
        key: &'a str,
        content: &'a [u8],
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<String, StorageError>> + Send + 'a>,
    >;
}

#[derive(Debug)]
pub enum StorageError {
    /// File exceeds the maximum allowed size.
    TooLarge { max_bytes: usize },
    /// Invalid storage key (empty, traversal attempt, or bad characters).
    InvalidKey(String),
    Io(std::io::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLarge { max_bytes } => {
                write!(f, "File exceeds maximum size of {} bytes", max_bytes)
            }
            Self::InvalidKey(msg) => write!(f, "Invalid storage key: {}", msg),
            Self::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Local filesystem store serving files from a base URL.
#[derive(Clone, Debug)]
pub struct LocalFileStore {
    base_dir: PathBuf,
    base_url: String,
    max_file_size: usize,
}

impl LocalFileStore {
    pub fn new(base_dir: PathBuf, base_url: String, max_file_size: usize) -> Self {
        Self {
            base_dir,
            base_url,
            max_file_size,
        }
    }

    /// Reject keys that could escape the base directory.
    fn validate_key(key: &str) -> Result<(), StorageError> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Key must not be empty, contain '..', or start with '/'".to_string(),
            ));
        }

        if !key
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '/' || c == '.')
        {
            return Err(StorageError::InvalidKey(
                "Key contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }
}

impl FileStore for LocalFileStore {
    fn save<'a>(
        &'a self,
        key: &'a str,
        content: &'a [u8],
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<String, StorageError>> + Send + 'a>,
    > {
        Box::pin(async move {
            Self::validate_key(key)?;

            if content.len() > self.max_file_size {
                return Err(StorageError::TooLarge {
                    max_bytes: self.max_file_size,
                });
            }

            let file_path = self.base_dir.join(key);
            if let Some(parent) = file_path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&file_path, content).await?;

            Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), key))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key_rejects_traversal() {
        assert!(LocalFileStore::validate_key("../etc/passwd").is_err());
        assert!(LocalFileStore::validate_key("/absolute").is_err());
        assert!(LocalFileStore::validate_key("").is_err());
    }

    #[test]
    fn test_validate_key_accepts_normal_keys() {
        assert!(LocalFileStore::validate_key("courses/5-logo.png").is_ok());
        assert!(LocalFileStore::validate_key("a_b-c.webp").is_ok());
    }

    #[tokio::test]
    async fn test_save_rejects_oversized_file() {
        let store = LocalFileStore::new(
            std::env::temp_dir(),
            "http://localhost:3000/files".to_string(),
            4,
        );
        let result = store.save("courses/too-big.png", &[0u8; 5]).await;
        assert!(matches!(result, Err(StorageError::TooLarge { .. })));
    }

    #[tokio::test]
    async fn test_save_returns_public_url() {
        let dir = std::env::temp_dir().join(format!("rollbook-test-{}", uuid::Uuid::new_v4()));
        let store = LocalFileStore::new(dir, "http://localhost:3000/files/".to_string(), 1024);
        let url = store.save("courses/1-logo.png", b"png").await.unwrap();
        assert_eq!(url, "http://localhost:3000/files/courses/1-logo.png");
    }
}
