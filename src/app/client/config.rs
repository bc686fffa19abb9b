//! HTTP client configuration and building logic
//!
//! This module handles the configuration and construction of the shared
//! HTTP client used for the listing page, the resolution feed and binary
//! transfers.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::constants::{http, limits};
use crate::errors::{DownloadError, DownloadResult};

/// Configuration for the shared HTTP client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// User agent for page and feed requests
    pub user_agent: String,
    /// TCP keep-alive settings
    pub tcp_keepalive: Option<Duration>,
    /// Connection pool idle timeout
    pub pool_idle_timeout: Option<Duration>,
    /// Maximum number of idle connections per host
    pub pool_max_per_host: usize,
    /// Per-request timeout, body transfer included
    pub request_timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Rate limit (requests per second)
    pub rate_limit_rps: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: http::USER_AGENT.to_string(),
            tcp_keepalive: Some(Duration::from_secs(30)),
            pool_idle_timeout: Some(http::POOL_IDLE_TIMEOUT),
            pool_max_per_host: http::POOL_MAX_PER_HOST,
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            rate_limit_rps: limits::DEFAULT_RATE_LIMIT_RPS,
        }
    }
}

impl ClientConfig {
    /// Builds the HTTP client with the specified configuration
    ///
    /// # Errors
    ///
    /// Returns `DownloadError::Http` if the TLS backend cannot be initialized
    pub fn build_http_client(&self) -> DownloadResult<Client> {
        let mut client_builder = Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(self.user_agent.as_str())
            .tcp_nodelay(true)
            .pool_max_idle_per_host(self.pool_max_per_host);

        if let Some(keepalive) = self.tcp_keepalive {
            client_builder = client_builder.tcp_keepalive(keepalive);
        }

        if let Some(idle_timeout) = self.pool_idle_timeout {
            client_builder = client_builder.pool_idle_timeout(idle_timeout);
        }

        client_builder.build().map_err(DownloadError::Http)
    }
}
