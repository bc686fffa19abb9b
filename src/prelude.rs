//! Prelude module for Clip Fetcher Library
//!
//! Re-exports the most commonly used items so a typical integration needs
//! a single `use clip_fetcher::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use clip_fetcher::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::load(None).await?;
//!     let store = Arc::new(LocalStore::new(&config.download.output_directory));
//!     println!("Saving clips to {}", store.output_directory().display());
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, Result};

// Configuration
pub use crate::config::AppConfig;

// Essential app components
pub use crate::app::{
    // Capabilities
    Downloader,
    ItemScraper,
    ItemStore,
    LinkResolver,
    ProgressCallback,

    // Implementations
    ClientConfig,
    ClipScraper,
    DownloadService,
    FeedResolver,
    HttpDownloader,
    LocalStore,
    WorkerConfig,

    // Data types
    BatchReport,
    Item,
};

// Commonly used constants
pub use crate::constants::{DEFAULT_RATE_LIMIT_RPS, DEFAULT_WORKER_COUNT, USER_AGENT};

// Standard library re-exports that are commonly needed
pub use std::path::{Path, PathBuf};
pub use std::sync::Arc;

pub use tokio;
