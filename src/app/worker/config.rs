//! Worker configuration management
//!
//! Configuration and validation for the single-item downloader and the
//! batch pool: pool size, attempts per item and the linear backoff unit.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{http, limits, workers};
use crate::errors::{DownloadError, DownloadResult};

/// Configuration for download workers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Number of concurrent workers in a batch
    pub worker_count: usize,
    /// Transfer attempts per item, first attempt included
    pub retry_attempts: u32,
    /// Backoff unit; the wait after attempt `n` is `n` units
    pub backoff_unit: Duration,
    /// Request timeout, reported when a transfer times out
    pub download_timeout: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            worker_count: workers::DEFAULT_WORKER_COUNT,
            retry_attempts: limits::DEFAULT_RETRY_ATTEMPTS,
            backoff_unit: limits::RETRY_BACKOFF_UNIT,
            download_timeout: http::DEFAULT_TIMEOUT,
        }
    }
}

impl WorkerConfig {
    /// Validate configuration values and return errors for invalid settings
    pub fn validate(&self) -> DownloadResult<()> {
        if self.worker_count == 0 {
            return Err(DownloadError::ConfigurationError(
                "Worker count cannot be zero".to_string(),
            ));
        }

        if self.worker_count > workers::MAX_WORKER_COUNT {
            return Err(DownloadError::ConfigurationError(format!(
                "Worker count ({}) exceeds maximum ({})",
                self.worker_count,
                workers::MAX_WORKER_COUNT
            )));
        }

        if self.retry_attempts == 0 {
            return Err(DownloadError::ConfigurationError(
                "Retry attempts must be at least one".to_string(),
            ));
        }

        Ok(())
    }

    /// Wait before the attempt that follows `attempt`
    ///
    /// `None` after the final attempt: there is nothing left to wait for.
    pub fn delay_after_attempt(&self, attempt: u32) -> Option<Duration> {
        (attempt < self.retry_attempts).then(|| self.backoff_unit * attempt)
    }
}

/// Builder for WorkerConfig
#[derive(Debug, Default)]
pub struct WorkerConfigBuilder {
    config: WorkerConfig,
}

impl WorkerConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of workers
    pub fn worker_count(mut self, count: usize) -> Self {
        self.config.worker_count = count;
        self
    }

    /// Set attempts per item
    pub fn retry_attempts(mut self, attempts: u32) -> Self {
        self.config.retry_attempts = attempts;
        self
    }

    /// Set the backoff unit
    pub fn backoff_unit(mut self, unit: Duration) -> Self {
        self.config.backoff_unit = unit;
        self
    }

    /// Set the request timeout used in timeout errors
    pub fn download_timeout(mut self, timeout: Duration) -> Self {
        self.config.download_timeout = timeout;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> DownloadResult<WorkerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
