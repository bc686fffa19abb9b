//! Clip Fetcher Library
//!
//! A Rust library for mirroring published music clips to a local,
//! year-organized directory tree. Lists clips from the public listing page,
//! resolves download links from the publication media feed and downloads
//! new clips concurrently with retry and atomic writes.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use constants::*;

    #[test]
    fn test_constants_accessible() {
        assert_eq!(DEFAULT_WORKER_COUNT, 8);
        assert_eq!(MEDIA_EXTENSION, ".mp3");
        assert!(USER_AGENT.contains("ClipFetcher"));
    }

    #[test]
    fn test_error_types() {
        let app_error = AppError::NoValidItems;

        assert_eq!(app_error.category(), "catalog");
        assert!(!app_error.is_recoverable());
    }
}
