//! Error types for Clip Fetcher
//!
//! This module defines the error types for every stage of the pipeline:
//! listing, link resolution, storage, downloading and configuration.
//! Errors are designed to be actionable and provide clear context for
//! debugging and user feedback.

use std::path::PathBuf;
use thiserror::Error;

/// Download and HTTP transfer errors
#[derive(Error, Debug)]
pub enum DownloadError {
    /// HTTP request error (connection, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Item has no resolved download URL
    #[error("No download URL found for item: {title}")]
    MissingDownloadUrl { title: String },

    /// I/O error during file operations
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Download timeout
    #[error("Download timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// Server returned a non-200 status
    #[error("Server error: HTTP {status}")]
    ServerError { status: u16 },

    /// Atomic file operation failed
    #[error("Atomic file operation failed: could not rename {temp_path} to {final_path}")]
    AtomicOperationFailed {
        temp_path: PathBuf,
        final_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Target directory could not be prepared
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// All attempts spent; wraps the error from the final attempt
    #[error("Download failed after {attempts} attempts: {source}")]
    MaxRetriesExceeded {
        attempts: u32,
        #[source]
        source: Box<DownloadError>,
    },

    /// Incomplete download
    #[error("Incomplete download: received {received} bytes, expected {expected} bytes")]
    IncompleteDownload { received: u64, expected: u64 },

    /// Invalid runtime configuration
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Batch worker failure
    #[error(transparent)]
    Queue(#[from] QueueError),
}

impl DownloadError {
    /// Whether another attempt of the same transfer may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DownloadError::Http(_)
                | DownloadError::Io(_)
                | DownloadError::Timeout { .. }
                | DownloadError::ServerError { .. }
                | DownloadError::IncompleteDownload { .. }
                | DownloadError::AtomicOperationFailed { .. }
        )
    }
}

/// Listing page scraping errors
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// HTTP request failed
    #[error("Web scraping HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Listing page returned a non-200 status
    #[error("Listing page returned HTTP {status}")]
    ServerError { status: u16 },

    /// CSS selector error
    #[error("Invalid CSS selector: {selector}")]
    InvalidSelector { selector: String },

    /// Invalid URL discovered during scraping
    #[error("Invalid URL discovered: {url}")]
    InvalidUrl { url: String },

    /// Link resolution failed during enrichment
    #[error(transparent)]
    Resolver(#[from] ResolverError),
}

/// Resolution feed errors
#[derive(Error, Debug)]
pub enum ResolverError {
    /// Network failure while fetching the feed
    #[error("Resolution feed request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Feed returned a non-200 status
    #[error("Resolution feed returned HTTP {status}")]
    ServerError { status: u16 },

    /// Feed body was not the expected JSON document
    #[error("Resolution feed could not be decoded: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Output directory errors
#[derive(Error, Debug)]
pub enum StorageError {
    /// Bucket directory could not be created
    #[error("Failed to create directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Batch worker pool errors
#[derive(Error, Debug)]
pub enum QueueError {
    /// Worker panic or unexpected termination
    #[error("Worker {worker_id} panicked or terminated unexpectedly")]
    WorkerPanic { worker_id: usize },

    /// Channel communication error
    #[error("Channel communication error")]
    ChannelError,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid configuration format
    #[error("Invalid configuration format: {0}")]
    InvalidFormat(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// I/O error reading or writing the configuration file
    #[error("Configuration I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// Could not determine a user directory
    #[error("Could not determine the {which} directory")]
    MissingDirectory { which: &'static str },
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Download error
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Scraping error
    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    /// Link resolution error
    #[error(transparent)]
    Resolver(#[from] ResolverError),

    /// Storage error
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The listing page produced no items
    #[error("No clips found on the listing page")]
    NoItemsListed,

    /// No listed item survived enrichment
    #[error("No valid clips found after resolving download links")]
    NoValidItems,

    /// Requested title is not on the listing page
    #[error("Clip not found: {title}")]
    ItemNotFound { title: String },

    /// Item is missing a title, source URL or download URL
    #[error("Invalid clip: {title}")]
    InvalidItem { title: String },
}

impl AppError {
    /// Check if the error is recoverable (transient)
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Download(e) => e.is_retryable(),
            AppError::Scrape(ScrapeError::Http(_))
            | AppError::Resolver(ResolverError::Http(_))
            | AppError::Scrape(ScrapeError::Resolver(ResolverError::Http(_))) => true,
            _ => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Download(_) => "download",
            AppError::Scrape(_) => "scraping",
            AppError::Resolver(_) => "resolver",
            AppError::Storage(_) => "storage",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::NoItemsListed
            | AppError::NoValidItems
            | AppError::ItemNotFound { .. }
            | AppError::InvalidItem { .. } => "catalog",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Download result type alias
pub type DownloadResult<T> = std::result::Result<T, DownloadError>;

/// Scraping result type alias
pub type ScrapeResult<T> = std::result::Result<T, ScrapeError>;

/// Resolver result type alias
pub type ResolverResult<T> = std::result::Result<T, ResolverError>;

/// Storage result type alias
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
