//! Core application logic for Clip Fetcher
//!
//! This module contains the download-and-resolution engine: data models,
//! capability traits, the HTTP client, link resolution, listing scraper,
//! output storage, download workers and the orchestration service.
//!
//! # Examples
//!
//! ```rust,no_run
//! use clip_fetcher::app::{
//!     ClientConfig, ClipScraper, DownloadService, FeedResolver, HttpDownloader, LocalStore,
//!     WorkerConfig,
//! };
//! use clip_fetcher::constants::site;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let http = ClientConfig::default().build_handler()?;
//! let store = Arc::new(LocalStore::new("/tmp/clips"));
//! let resolver = Arc::new(FeedResolver::new(http.clone(), site::FEED_URL));
//! let scraper = Arc::new(ClipScraper::new(http.clone(), resolver));
//! let downloader = Arc::new(HttpDownloader::new(WorkerConfig::default(), http, store.clone())?);
//!
//! let service = DownloadService::new(scraper, store, downloader);
//! service.download_all(site::LISTING_URL).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod models;
pub mod resolver;
pub mod scraper;
pub mod service;
pub mod storage;
pub mod traits;
pub mod worker;

// Re-export main public API
pub use client::{ClientConfig, HttpHandler};
pub use models::{sanitize_filename, Item};
pub use resolver::FeedResolver;
pub use scraper::ClipScraper;
pub use service::DownloadService;
pub use storage::LocalStore;
pub use traits::{Downloader, ItemScraper, ItemStore, LinkResolver, ProgressCallback};
pub use worker::{BatchReport, HttpDownloader, WorkerConfig};
