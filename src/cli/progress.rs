//! Batch progress display for download operations
//!
//! A single indicatif spinner counts finished clips. The number of pending
//! clips is only known inside the pipeline, so the display has no length.
//! It is driven by the downloader's progress callback and advances from
//! whichever worker completes a transfer. Off a terminal it is hidden.

use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::app::ProgressCallback;

const BAR_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {pos} clips downloaded {msg}";

/// Completion bar for one download batch
#[derive(Clone)]
pub struct BatchProgress {
    bar: ProgressBar,
}

impl BatchProgress {
    /// Create the display; it is drawn only when `enabled` and stderr is a terminal
    pub fn new(enabled: bool) -> Self {
        let is_terminal = atty::is(atty::Stream::Stderr);
        if !enabled || !is_terminal {
            debug!(is_terminal, enabled, "Progress bar disabled");
            return Self {
                bar: ProgressBar::hidden(),
            };
        }

        let bar = ProgressBar::new_spinner();
        match ProgressStyle::default_spinner().template(BAR_TEMPLATE) {
            Ok(style) => bar.set_style(style),
            Err(e) => debug!("Progress bar template error: {}", e),
        }
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_message("Listing clips...");

        Self { bar }
    }

    /// Callback that advances the bar once per finished clip
    pub fn callback(&self) -> ProgressCallback {
        let bar = self.bar.clone();
        Arc::new(move |_downloaded: u64, _total: u64, title: &str| {
            bar.inc(1);
            bar.set_message(title.to_string());
        })
    }

    /// Number of clips counted so far
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Stop the bar, leaving `message` on screen
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}
