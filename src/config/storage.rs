use std::env;
use std::path::PathBuf;

use crate::utils::storage::LocalFileStore;

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    pub public_url: String,
    pub max_file_size: usize,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        Self {
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("storage/uploads")),
            public_url: env::var("FILES_PUBLIC_URL")
                .unwrap_or_else(|_| "http://localhost:3000/files".to_string()),
            max_file_size: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5 * 1024 * 1024), // 5MB
        }
    }

    pub fn file_store(&self) -> LocalFileStore {
        LocalFileStore::new(
            self.upload_dir.clone(),
            self.public_url.clone(),
            self.max_file_size,
        )
    }
}
