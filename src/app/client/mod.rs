//! HTTP client shared by every network-facing stage
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and building
//! - `http`: rate-limited request operations
//! - `download`: streaming transfers with atomic writes

pub mod config;
pub mod download;
pub mod http;

use std::sync::Arc;

pub use config::ClientConfig;
pub use download::{write_atomically, DownloadHandler, Transfer};
pub use http::HttpHandler;

use crate::errors::DownloadResult;

impl ClientConfig {
    /// Builds a shareable, rate-limited handler from this configuration
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if the client cannot be built or the rate is zero
    pub fn build_handler(&self) -> DownloadResult<Arc<HttpHandler>> {
        let client = self.build_http_client()?;
        let handler = HttpHandler::new(client, self.rate_limit_rps)?;
        tracing::debug!(
            "Created HTTP handler ({} req/s, timeout {:?})",
            self.rate_limit_rps,
            self.request_timeout
        );
        Ok(Arc::new(handler))
    }
}
