//! Application constants for Clip Fetcher
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain for maintainability and clarity.

use std::time::Duration;

/// Environment variable names for configuration overrides
pub mod env {
    /// Overrides `[download] output_directory`
    pub const OUTPUT_DIR: &str = "CLIP_FETCHER_OUTPUT_DIR";

    /// Overrides `[download] concurrent_workers`
    pub const WORKERS: &str = "CLIP_FETCHER_WORKERS";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for page and feed requests
    pub const USER_AGENT: &str = "ClipFetcher/0.1";

    /// Fixed user agent for binary transfers
    pub const DOWNLOAD_USER_AGENT: &str = "ClipFetcher-Downloader/0.1";

    /// Accept header for the listing page
    pub const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

    /// Accept header for the resolution feed
    pub const ACCEPT_JSON: &str = "application/json";

    /// Accept-Language header sent with page and feed requests
    pub const ACCEPT_LANGUAGE: &str = "pt-BR,pt;q=0.9,en;q=0.8";

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Maximum idle connections per host in pool
    pub const POOL_MAX_PER_HOST: usize = 16;
}

/// Rate limiting and retry configuration
pub mod limits {
    use super::Duration;

    /// Default client-side request rate (requests per second)
    pub const DEFAULT_RATE_LIMIT_RPS: u32 = 15;

    /// Default number of transfer attempts per item
    pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

    /// One backoff unit; attempt `n` waits `n` units before attempt `n + 1`
    pub const RETRY_BACKOFF_UNIT: Duration = Duration::from_secs(1);

    /// Courtesy delay after each item enrichment
    pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_secs(1);
}

/// Remote site endpoints and scraping selectors
pub mod site {
    /// Listing page with all music clips
    pub const LISTING_URL: &str =
        "https://www.jw.org/pt/biblioteca/musica-canticos/clipes-musicais/";

    /// CSS selector for clip anchors on the listing page
    pub const CLIP_LINK_SELECTOR: &str = "h2 a[href*='/biblioteca/musica-canticos/clipes-musicais/']";

    /// Publication media API: MP3/AAC, Portuguese only, JSON output
    pub const FEED_URL: &str = "https://b.jw-cdn.org/apis/pub-media/GETPUBMEDIALINKS?output=json&pub=osg&fileformat=MP3%2CAAC&alllangs=0&langwritten=T&txtCMSLang=T";

    /// Token prefixed to some feed titles
    pub const PLAY_PREFIX: &str = "Reproduzir";

    /// Normalized feed titles must be longer than this many characters
    pub const MIN_TITLE_CHARS: usize = 2;
}

/// File operation constants
pub mod files {
    /// Temporary file suffix for atomic operations
    pub const TEMP_FILE_SUFFIX: &str = ".tmp";

    /// Extension appended to every sanitized filename
    pub const MEDIA_EXTENSION: &str = ".mp3";

    /// Bucket for items with an unknown year
    pub const OTHER_BUCKET: &str = "other";

    /// Buckets probed by the existence check before the root itself
    pub const LEGACY_BUCKETS: [&str; 5] = ["2025", "2024", "2023", "2022", OTHER_BUCKET];

    /// Default output root
    pub const DEFAULT_OUTPUT_DIR: &str = "~/Downloads/ClipFetcher";
}

/// Worker and concurrency configuration
pub mod workers {
    /// Default number of concurrent download workers
    pub const DEFAULT_WORKER_COUNT: usize = 8;

    /// Maximum recommended concurrent workers
    pub const MAX_WORKER_COUNT: usize = 64;
}

/// Configuration file locations
pub mod config {
    /// Project-local configuration file
    pub const LOCAL_FILE: &str = "clip-fetcher.toml";

    /// Directory name under the user config dir
    pub const APP_DIR: &str = "clip-fetcher";

    /// File name under the user config dir
    pub const FILE_NAME: &str = "config.toml";
}

// Re-export commonly used constants for convenience
pub use files::{MEDIA_EXTENSION, TEMP_FILE_SUFFIX};
pub use http::{DEFAULT_TIMEOUT as HTTP_TIMEOUT, USER_AGENT};
pub use limits::{DEFAULT_RATE_LIMIT_RPS, DEFAULT_RETRY_ATTEMPTS};
pub use workers::DEFAULT_WORKER_COUNT;
