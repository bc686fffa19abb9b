//! Core download worker implementation
//!
//! [`DownloadWorker`] downloads one resolved item: it skips files that
//! already exist, prepares the bucket directory and retries the transfer
//! with a linear backoff. The batch pool drives many of these concurrently
//! through the [`ItemTransfer`] seam.

use std::path::Path;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use super::config::WorkerConfig;
use super::types::WorkerResult;
use crate::app::client::{DownloadHandler, HttpHandler, Transfer};
use crate::app::models::Item;
use crate::app::traits::{ItemStore, ProgressCallback};
use crate::errors::DownloadError;

/// Single-item transfer as seen by the batch pool
///
/// Returns the declared content length of a completed transfer, or `None`
/// when the item was skipped or the server declared no length.
#[async_trait]
pub trait ItemTransfer: Send + Sync {
    async fn transfer(&self, item: &Item) -> WorkerResult<Option<u64>>;
}

/// Single-item downloader with retry
pub struct DownloadWorker {
    /// Worker configuration
    config: WorkerConfig,
    /// Shared rate-limited HTTP handler
    http: Arc<HttpHandler>,
    /// Output layout and existence index
    store: Arc<dyn ItemStore>,
    /// Completion callback
    progress: RwLock<Option<ProgressCallback>>,
}

impl std::fmt::Debug for DownloadWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadWorker")
            .field("config", &self.config)
            .field("output_directory", &self.store.output_directory())
            .finish_non_exhaustive()
    }
}

impl DownloadWorker {
    /// Create a new download worker
    pub fn new(config: WorkerConfig, http: Arc<HttpHandler>, store: Arc<dyn ItemStore>) -> Self {
        Self {
            config,
            http,
            store,
            progress: RwLock::new(None),
        }
    }

    /// Register the completion callback, replacing any previous one
    pub fn set_progress_callback(&self, callback: ProgressCallback) {
        match self.progress.write() {
            Ok(mut slot) => *slot = Some(callback),
            Err(poisoned) => *poisoned.into_inner() = Some(callback),
        }
    }

    /// Worker configuration
    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Download `item` into the store
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The item has no download URL
    /// - The bucket directory cannot be created
    /// - Every attempt failed (`MaxRetriesExceeded` wrapping the last error)
    pub async fn download(&self, item: &Item) -> WorkerResult<Option<u64>> {
        if item.download_url.is_empty() {
            return Err(DownloadError::MissingDownloadUrl {
                title: item.title.clone(),
            });
        }

        if self.store.exists(item.filename()).await {
            debug!(title = %item.title, "Already downloaded, skipping");
            return Ok(None);
        }

        self.store.ensure_directory(item).await?;
        let path = self.store.file_path(item);

        let transfer = self.download_with_retry(item, &path).await?;

        info!(
            title = %item.title,
            path = %path.display(),
            bytes = transfer.bytes_written,
            "Download complete"
        );

        if let Some(total) = transfer.content_length {
            self.notify_progress(total, &item.title);
        }

        Ok(transfer.content_length)
    }

    async fn download_with_retry(&self, item: &Item, path: &Path) -> WorkerResult<Transfer> {
        let handler = DownloadHandler::new(&self.http);
        let attempts = self.config.retry_attempts.max(1);
        let mut attempt = 1;

        loop {
            debug!(title = %item.title, attempt, "Starting transfer");

            let error = match handler.download_file(&item.download_url, path).await {
                Ok(transfer) => return Ok(transfer),
                Err(e) => self.classify(e),
            };

            match self.config.delay_after_attempt(attempt) {
                Some(delay) if attempt < attempts => {
                    warn!(
                        "Download failed (attempt {}/{}) for {}: {}. Retrying in {}ms",
                        attempt,
                        attempts,
                        item.title,
                        error,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                _ => {
                    error!(
                        "Download failed after {} attempts for {}: {}",
                        attempts, item.title, error
                    );
                    return Err(DownloadError::MaxRetriesExceeded {
                        attempts,
                        source: Box::new(error),
                    });
                }
            }
        }
    }

    fn classify(&self, error: DownloadError) -> DownloadError {
        match error {
            DownloadError::Http(e) if e.is_timeout() => DownloadError::Timeout {
                seconds: self.config.download_timeout.as_secs(),
            },
            other => other,
        }
    }

    fn notify_progress(&self, total: u64, title: &str) {
        let callback = match self.progress.read() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };

        if let Some(callback) = callback {
            callback(total, total, title);
        }
    }
}

#[async_trait]
impl ItemTransfer for DownloadWorker {
    async fn transfer(&self, item: &Item) -> WorkerResult<Option<u64>> {
        self.download(item).await
    }
}

/// Builder for DownloadWorker
#[derive(Default)]
pub struct DownloadWorkerBuilder {
    config: Option<WorkerConfig>,
    http: Option<Arc<HttpHandler>>,
    store: Option<Arc<dyn ItemStore>>,
}

impl DownloadWorkerBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set worker configuration
    pub fn config(mut self, config: WorkerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the HTTP handler
    pub fn http(mut self, http: Arc<HttpHandler>) -> Self {
        self.http = Some(http);
        self
    }

    /// Set the item store
    pub fn store(mut self, store: Arc<dyn ItemStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the worker
    ///
    /// # Errors
    ///
    /// Returns `DownloadError::ConfigurationError` if a component is missing
    /// or the configuration is invalid
    pub fn build(self) -> WorkerResult<DownloadWorker> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let http = self.http.ok_or_else(|| {
            DownloadError::ConfigurationError("HTTP handler is required".to_string())
        })?;
        let store = self.store.ok_or_else(|| {
            DownloadError::ConfigurationError("Item store is required".to_string())
        })?;

        Ok(DownloadWorker::new(config, http, store))
    }
}
