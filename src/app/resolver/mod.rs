//! Title to download link resolution
//!
//! [`FeedResolver`] answers lookups from an in-memory cache that is filled
//! by a single bulk load of the publication media feed on the first miss.
//!
//! # Key Features
//!
//! - **Load once**: after a successful load, misses never trigger another fetch
//! - **Mutually exclusive load**: concurrent first misses share one fetch
//! - **Explicit state**: an empty feed still counts as loaded
//! - **Hard failures**: transport, status and decode errors are returned as-is

pub mod feed;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::app::client::HttpHandler;
use crate::app::traits::LinkResolver;
use crate::constants::http;
use crate::errors::{ResolverError, ResolverResult};

pub use feed::{normalize_title, FeedResponse};

/// In-memory resolution cache
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: HashMap<String, String>,
    loaded: bool,
}

impl ResolutionCache {
    /// Whether the bulk load already completed
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }
}

/// Link resolver backed by the remote JSON feed
pub struct FeedResolver {
    http: Arc<HttpHandler>,
    feed_url: String,
    cache: Mutex<ResolutionCache>,
}

impl FeedResolver {
    /// Create a resolver with an empty, unloaded cache
    ///
    /// # Arguments
    ///
    /// * `http` - Shared rate-limited HTTP handler
    /// * `feed_url` - Resolution feed endpoint
    pub fn new(http: Arc<HttpHandler>, feed_url: impl Into<String>) -> Self {
        Self {
            http,
            feed_url: feed_url.into(),
            cache: Mutex::new(ResolutionCache::default()),
        }
    }

    /// Whether the bulk load already completed
    pub async fn is_loaded(&self) -> bool {
        self.cache.lock().await.is_loaded()
    }

    /// Number of cached titles
    pub async fn cached_titles(&self) -> usize {
        self.cache.lock().await.len()
    }

    async fn fetch_links(&self) -> ResolverResult<HashMap<String, String>> {
        info!("Loading download links from {}", self.feed_url);

        let response = self
            .http
            .get_document(&self.feed_url, http::ACCEPT_JSON)
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(ResolverError::ServerError { status });
        }

        let body = response.text().await?;
        let feed: FeedResponse = serde_json::from_str(&body)?;
        Ok(feed.into_links())
    }
}

#[async_trait]
impl LinkResolver for FeedResolver {
    async fn resolve(&self, title: &str) -> ResolverResult<Option<String>> {
        let key = title.trim();

        // Held across the load so concurrent first misses share one fetch
        let mut cache = self.cache.lock().await;

        if let Some(url) = cache.get(key) {
            return Ok(Some(url));
        }

        if !cache.loaded {
            let links = self.fetch_links().await?;
            cache.entries.extend(links);
            cache.loaded = true;
            info!(titles = cache.len(), "Resolution cache loaded");
        }

        let url = cache.get(key);
        if url.is_none() {
            debug!(title = key, "No download link found");
        }
        Ok(url)
    }
}
