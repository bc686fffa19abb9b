//! Command-line interface components
//!
//! This module contains CLI-specific code for the Clip Fetcher application:
//! argument parsing, service wiring, command handlers and the progress
//! display.

pub mod args;
pub mod commands;
pub mod progress;

pub use args::{Cli, Commands, ConfigAction, ConfigArgs, DownloadArgs, DownloadTarget, GlobalArgs};
pub use commands::{build_service, failure_message, handle_check, handle_config, handle_download};
pub use progress::BatchProgress;
