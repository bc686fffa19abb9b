//! Listing page scraping and per-item enrichment
//!
//! [`ClipScraper`] lists clips from the public listing page and enriches
//! each one with its download link, looked up by title through a
//! [`LinkResolver`]. Enrichment is sequential and pauses for a fixed
//! courtesy delay after every item.

pub mod listing;
pub mod year;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};
use url::Url;

use crate::app::client::HttpHandler;
use crate::app::models::Item;
use crate::app::traits::{ItemScraper, LinkResolver};
use crate::constants::{http, limits};
use crate::errors::{ScrapeError, ScrapeResult};

pub use listing::parse_listing;
pub use year::extract_year;

/// Scraper over the public clip listing
pub struct ClipScraper {
    http: Arc<HttpHandler>,
    resolver: Arc<dyn LinkResolver>,
    delay: Duration,
}

impl ClipScraper {
    /// Create a scraper using the default courtesy delay
    pub fn new(http: Arc<HttpHandler>, resolver: Arc<dyn LinkResolver>) -> Self {
        Self {
            http,
            resolver,
            delay: limits::DEFAULT_REQUEST_DELAY,
        }
    }

    /// Set the courtesy delay applied after each enrichment
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl ItemScraper for ClipScraper {
    async fn list(&self, base_url: &str) -> ScrapeResult<Vec<Item>> {
        let page_url = Url::parse(base_url).map_err(|_| ScrapeError::InvalidUrl {
            url: base_url.to_string(),
        })?;

        info!("Fetching clip listing from {}", page_url);
        let response = self
            .http
            .get_document(page_url.as_str(), http::ACCEPT_HTML)
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(ScrapeError::ServerError { status });
        }

        let html = response.text().await?;
        let items = parse_listing(&html, &page_url)?;

        info!(total = items.len(), "Listing scraped");
        Ok(items)
    }

    async fn enrich(&self, item: &mut Item) -> ScrapeResult<()> {
        debug!(title = %item.title, url = %item.url, "Enriching clip");

        if let Some(download_url) = self.resolver.resolve(&item.title).await? {
            debug!(title = %item.title, download_url = %download_url, "Download link found");
            item.download_url = download_url;
        }

        if item.year.is_none() {
            item.year = extract_year(&item.title);
        }

        tokio::time::sleep(self.delay).await;

        item.description = format!("Music clip: {}", item.title);
        Ok(())
    }
}
