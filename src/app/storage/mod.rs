//! Output directory management and existence index
//!
//! [`LocalStore`] owns the output root. It answers "is this file already
//! downloaded?" across the legacy bucket layout, creates year buckets on
//! demand and computes final paths without touching the filesystem.

pub mod path;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, error};

use crate::app::models::Item;
use crate::app::traits::ItemStore;
use crate::errors::{StorageError, StorageResult};

pub use path::PathGenerator;

/// Filesystem-backed item store rooted at the output directory
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Create a store rooted at `root`; nothing is created yet
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ItemStore for LocalStore {
    async fn exists(&self, filename: &str) -> bool {
        for candidate in PathGenerator::existence_candidates(&self.root, filename) {
            if tokio::fs::try_exists(&candidate).await.unwrap_or(false) {
                debug!(path = %candidate.display(), "File already exists");
                return true;
            }
        }
        false
    }

    fn output_directory(&self) -> &Path {
        &self.root
    }

    async fn ensure_directory(&self, item: &Item) -> StorageResult<PathBuf> {
        let dir = PathGenerator::bucket_dir(&self.root, item);

        tokio::fs::create_dir_all(&dir).await.map_err(|source| {
            error!(path = %dir.display(), error = %source, "Failed to create directory");
            StorageError::CreateDirectory {
                path: dir.clone(),
                source,
            }
        })?;

        debug!(path = %dir.display(), "Directory created/verified");
        Ok(dir)
    }

    fn file_path(&self, item: &Item) -> PathBuf {
        PathGenerator::file_path(&self.root, item)
    }
}
