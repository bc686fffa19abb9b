//! Worker type definitions and data structures
//!
//! Outcome records produced by the batch pool and the aggregated report.

use crate::app::models::Item;
use crate::errors::DownloadError;

/// Result type for worker operations
pub type WorkerResult<T> = Result<T, DownloadError>;

/// One recorded outcome of a batch item
#[derive(Debug)]
pub struct ItemOutcome {
    /// Worker that processed the item
    pub worker_id: usize,
    /// The item, with `byte_size` filled when the server declared it
    pub item: Item,
    /// Transfer result
    pub result: WorkerResult<()>,
}

/// Aggregated outcome of one batch
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Items submitted
    pub total: usize,
    /// Items downloaded or already present
    pub succeeded: usize,
    /// Items that failed, unrecorded ones included
    pub failed: usize,
    /// First failure in collection order
    pub first_error: Option<DownloadError>,
}

impl BatchReport {
    /// Empty report for `total` submitted items
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    /// Record a success
    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    /// Record a failure; only the first one is kept
    pub fn record_failure(&mut self, error: DownloadError) {
        self.failed += 1;
        if self.first_error.is_none() {
            self.first_error = Some(error);
        }
    }

    /// Number of outcomes recorded so far
    pub fn recorded(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Whether every item succeeded
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Collapse into the batch result: the first failure, if any
    pub fn into_result(self) -> WorkerResult<()> {
        match self.first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_failure_wins() {
        let mut report = BatchReport::new(4);
        report.record_success();
        report.record_failure(DownloadError::ServerError { status: 404 });
        report.record_failure(DownloadError::ServerError { status: 500 });
        report.record_success();

        assert_eq!(report.recorded(), 4);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 2);
        assert!(!report.is_success());
        assert!(matches!(
            report.into_result(),
            Err(DownloadError::ServerError { status: 404 })
        ));
    }

    #[test]
    fn test_empty_batch_is_success() {
        let report = BatchReport::new(0);
        assert!(report.is_success());
        assert!(report.into_result().is_ok());
    }
}
