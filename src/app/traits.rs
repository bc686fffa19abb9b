//! Capability interfaces composed by the download service.
//!
//! Production code uses [`LocalStore`](crate::app::LocalStore),
//! [`FeedResolver`](crate::app::FeedResolver),
//! [`ClipScraper`](crate::app::ClipScraper) and
//! [`HttpDownloader`](crate::app::HttpDownloader); tests substitute
//! in-memory implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::app::models::Item;
use crate::errors::{DownloadResult, ResolverResult, ScrapeResult, StorageResult};

/// Completion callback: `(current, total, title)`
pub type ProgressCallback = Arc<dyn Fn(u64, u64, &str) + Send + Sync>;

/// Output directory layout and existence index
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Whether `filename` is already present in a known bucket or the root
    async fn exists(&self, filename: &str) -> bool;

    /// Configured output root
    fn output_directory(&self) -> &Path;

    /// Create the bucket directory for `item`, returning it
    async fn ensure_directory(&self, item: &Item) -> StorageResult<PathBuf>;

    /// Final on-disk path for `item`; never touches the filesystem
    fn file_path(&self, item: &Item) -> PathBuf;
}

/// Title to download URL lookup
#[async_trait]
pub trait LinkResolver: Send + Sync {
    /// Resolve `title`; a miss is `Ok(None)`, a failed bulk load is an error
    async fn resolve(&self, title: &str) -> ResolverResult<Option<String>>;
}

/// Listing page scraping and per-item enrichment
#[async_trait]
pub trait ItemScraper: Send + Sync {
    /// List candidate items in document order
    async fn list(&self, base_url: &str) -> ScrapeResult<Vec<Item>>;

    /// Attach download URL, year and description to `item` in place
    async fn enrich(&self, item: &mut Item) -> ScrapeResult<()>;
}

/// Binary transfer of resolved items
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Download one item into the store, skipping it if already present
    async fn download(&self, item: &Item) -> DownloadResult<()>;

    /// Download many items concurrently; returns the first collected failure
    async fn download_batch(&self, items: Vec<Item>) -> DownloadResult<()>;

    /// Register the completion callback
    fn set_progress_callback(&self, callback: ProgressCallback);
}
