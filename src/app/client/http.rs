//! Core HTTP operations with client-side rate limiting
//!
//! Every outbound request (listing page, resolution feed and binary
//! transfers) goes through one [`HttpHandler`] so the configured request
//! rate holds across the whole pipeline. Status handling is left to the
//! caller, each of which maps failures into its own error type.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::{clock::DefaultClock, state::InMemoryState, Jitter, Quota, RateLimiter};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::{Client, Response};

use crate::constants::http;
use crate::errors::{DownloadError, DownloadResult};

type DirectRateLimiter = RateLimiter<governor::state::NotKeyed, InMemoryState, DefaultClock>;

/// Rate-limited HTTP operations handler
#[derive(Debug)]
pub struct HttpHandler {
    client: Client,
    rate_limiter: DirectRateLimiter,
}

impl HttpHandler {
    /// Creates a new HttpHandler with the given client and rate limiting
    ///
    /// # Arguments
    ///
    /// * `client` - The HTTP client to use for requests
    /// * `rate_limit_rps` - Requests per second rate limit
    ///
    /// # Errors
    ///
    /// Returns `DownloadError::ConfigurationError` if the rate is zero
    pub fn new(client: Client, rate_limit_rps: u32) -> DownloadResult<Self> {
        let rate_limiter = Self::build_rate_limiter(rate_limit_rps)?;
        Ok(Self {
            client,
            rate_limiter,
        })
    }

    fn build_rate_limiter(rate_limit_rps: u32) -> DownloadResult<DirectRateLimiter> {
        let rps = NonZeroU32::new(rate_limit_rps).ok_or_else(|| {
            DownloadError::ConfigurationError("Rate limit must be non-zero".to_string())
        })?;
        Ok(RateLimiter::direct(Quota::per_second(rps)))
    }

    async fn throttle(&self) {
        self.rate_limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(50)))
            .await;
    }

    /// Fetches a page or document with browser-like headers
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to fetch
    /// * `accept` - Value for the `Accept` header
    ///
    /// # Errors
    ///
    /// Returns the transport error; non-2xx statuses are not errors here
    pub async fn get_document(&self, url: &str, accept: &str) -> reqwest::Result<Response> {
        self.throttle().await;
        tracing::debug!("GET {}", url);

        self.client
            .get(url)
            .header(ACCEPT, accept)
            .header(ACCEPT_LANGUAGE, http::ACCEPT_LANGUAGE)
            .send()
            .await
    }

    /// Starts a binary transfer with the fixed downloader user agent
    ///
    /// The response body is not read; callers stream it.
    pub async fn get_binary(&self, url: &str) -> reqwest::Result<Response> {
        self.throttle().await;
        tracing::debug!("GET (binary) {}", url);

        self.client
            .get(url)
            .header(USER_AGENT, http::DOWNLOAD_USER_AGENT)
            .send()
            .await
    }
}
