//! Download workers for single items and batches
//!
//! # Key Features
//!
//! - **Existence skip**: files already on disk are never fetched again
//! - **Atomic writes**: bodies stream into a `.tmp` sibling, then rename
//! - **Linear backoff**: attempt `n` is followed by a wait of `n` units
//! - **Bounded pool**: a fixed number of tasks drain a closed queue
//! - **First error wins**: a batch reports its first collected failure
//!
//! # Module Organization
//!
//! - [`config`] - Worker configuration with validation
//! - [`types`] - Batch outcomes and the aggregated report
//! - [`core`] - Single-item download with retry
//! - [`pool`] - Batch fan-out and aggregation
//! - [`downloader`] - [`Downloader`](crate::app::traits::Downloader) implementation

pub mod config;
pub mod core;
pub mod downloader;
pub mod pool;
pub mod types;

pub use config::{WorkerConfig, WorkerConfigBuilder};
pub use self::core::{DownloadWorker, DownloadWorkerBuilder, ItemTransfer};
pub use downloader::HttpDownloader;
pub use pool::WorkerPool;
pub use types::{BatchReport, ItemOutcome, WorkerResult};
