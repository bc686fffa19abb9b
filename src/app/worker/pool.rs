//! Worker pool management and coordination
//!
//! [`WorkerPool`] fans a closed, pre-filled queue of items out to a fixed
//! number of tokio tasks, waits for every task to finish and aggregates
//! one outcome per submitted item into a [`BatchReport`].

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::config::WorkerConfig;
use super::core::ItemTransfer;
use super::types::{BatchReport, ItemOutcome};
use crate::app::models::Item;
use crate::errors::QueueError;

/// Pool running one batch of downloads
pub struct WorkerPool {
    /// Worker configuration
    config: WorkerConfig,
    /// Shared single-item transfer
    transfer: Arc<dyn ItemTransfer>,
}

impl WorkerPool {
    /// Create a new worker pool
    pub fn new(config: WorkerConfig, transfer: Arc<dyn ItemTransfer>) -> Self {
        Self { config, transfer }
    }

    /// Number of workers spawned for a batch of `items` items
    pub fn worker_count(&self, items: usize) -> usize {
        self.config.worker_count.max(1).min(items)
    }

    /// Download every item and aggregate the outcomes
    ///
    /// Returns only after every worker task has finished. Items a panicked
    /// worker never recorded are counted as failures.
    pub async fn run(&self, items: Vec<Item>) -> BatchReport {
        let total = items.len();
        let mut report = BatchReport::new(total);
        if total == 0 {
            return report;
        }

        let (work_tx, work_rx) = mpsc::channel(total);
        for item in items {
            if work_tx.try_send(item).is_err() {
                // Capacity equals the item count and the receiver is alive
                report.record_failure(QueueError::ChannelError.into());
            }
        }
        drop(work_tx);

        let work_rx = Arc::new(Mutex::new(work_rx));
        let (result_tx, mut result_rx) = mpsc::unbounded_channel::<ItemOutcome>();

        let worker_count = self.worker_count(total);
        info!("Starting {} download workers for {} items", worker_count, total);

        let handles: Vec<(usize, JoinHandle<usize>)> = (0..worker_count)
            .map(|worker_id| {
                let work_rx = Arc::clone(&work_rx);
                let result_tx = result_tx.clone();
                let transfer = Arc::clone(&self.transfer);
                let handle = tokio::spawn(async move {
                    run_worker(worker_id, work_rx, result_tx, transfer).await
                });
                (worker_id, handle)
            })
            .collect();
        drop(result_tx);

        let mut panicked = Vec::new();
        for (worker_id, handle) in handles {
            match handle.await {
                Ok(processed) => debug!("Worker {} finished after {} items", worker_id, processed),
                Err(e) => {
                    error!("Worker {} terminated unexpectedly: {}", worker_id, e);
                    panicked.push(worker_id);
                }
            }
        }

        while let Some(outcome) = result_rx.recv().await {
            match outcome.result {
                Ok(()) => report.record_success(),
                Err(e) => {
                    error!(title = %outcome.item.title, error = %e, "Download failed");
                    report.record_failure(e);
                }
            }
        }

        let unrecorded = total.saturating_sub(report.recorded());
        if unrecorded > 0 {
            warn!("{} items produced no outcome", unrecorded);
            let worker_id = panicked.first().copied().unwrap_or_default();
            for _ in 0..unrecorded {
                report.record_failure(QueueError::WorkerPanic { worker_id }.into());
            }
        }

        info!(
            success = report.succeeded,
            failures = report.failed,
            total = report.total,
            "Batch finished"
        );
        report
    }
}

async fn run_worker(
    worker_id: usize,
    work_rx: Arc<Mutex<mpsc::Receiver<Item>>>,
    result_tx: mpsc::UnboundedSender<ItemOutcome>,
    transfer: Arc<dyn ItemTransfer>,
) -> usize {
    let mut processed = 0;

    loop {
        // The queue is closed and pre-filled, so recv never waits on a producer
        let next = work_rx.lock().await.recv().await;
        let Some(mut item) = next else {
            break;
        };

        let result = match transfer.transfer(&item).await {
            Ok(byte_size) => {
                if byte_size.is_some() {
                    item.byte_size = byte_size;
                }
                Ok(())
            }
            Err(e) => Err(e),
        };

        processed += 1;
        if result_tx
            .send(ItemOutcome {
                worker_id,
                item,
                result,
            })
            .is_err()
        {
            warn!("Worker {} could not record an outcome", worker_id);
            break;
        }
    }

    processed
}
