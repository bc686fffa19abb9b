//! Production [`Downloader`] built on the worker and the pool

use std::sync::Arc;

use async_trait::async_trait;

use super::config::WorkerConfig;
use super::core::{DownloadWorker, DownloadWorkerBuilder};
use super::pool::WorkerPool;
use super::types::{BatchReport, WorkerResult};
use crate::app::client::HttpHandler;
use crate::app::models::Item;
use crate::app::traits::{Downloader, ItemStore, ProgressCallback};

/// HTTP downloader writing into an [`ItemStore`]
#[derive(Debug)]
pub struct HttpDownloader {
    worker: Arc<DownloadWorker>,
}

impl HttpDownloader {
    /// Create a downloader
    ///
    /// # Errors
    ///
    /// Returns `DownloadError::ConfigurationError` if `config` is invalid
    pub fn new(
        config: WorkerConfig,
        http: Arc<HttpHandler>,
        store: Arc<dyn ItemStore>,
    ) -> WorkerResult<Self> {
        let worker = DownloadWorkerBuilder::new()
            .config(config)
            .http(http)
            .store(store)
            .build()?;
        Ok(Self {
            worker: Arc::new(worker),
        })
    }

    /// Run a batch and return the full report instead of the first error
    pub async fn run_batch(&self, items: Vec<Item>) -> BatchReport {
        let pool = WorkerPool::new(self.worker.config().clone(), self.worker.clone());
        pool.run(items).await
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn download(&self, item: &Item) -> WorkerResult<()> {
        self.worker.download(item).await.map(|_| ())
    }

    async fn download_batch(&self, items: Vec<Item>) -> WorkerResult<()> {
        self.run_batch(items).await.into_result()
    }

    fn set_progress_callback(&self, callback: ProgressCallback) {
        self.worker.set_progress_callback(callback);
    }
}
