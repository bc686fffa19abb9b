//! Command-line argument parsing for Clip Fetcher
//!
//! This module defines the CLI structure using clap derive macros:
//! downloading all or one clip, checking for new clips and managing the
//! configuration file.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Clip Fetcher - Mirror published music clips locally
#[derive(Parser, Debug)]
#[command(
    name = "clip_fetcher",
    version,
    about = "Download published music clips into a year-organized folder",
    long_about = "Lists the published music clips, resolves their download links and saves new
clips under <output>/<year>/. Already downloaded clips are skipped."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output directory for this run (overrides the config file)
    #[arg(short, long, global = true, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download clips
    Download(DownloadArgs),

    /// List clips that are not downloaded yet
    Check,

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the download command
#[derive(Args, Debug)]
pub struct DownloadArgs {
    #[command(subcommand)]
    pub target: DownloadTarget,
}

/// What to download
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum DownloadTarget {
    /// Download every clip not yet present
    All,

    /// Download one clip by its exact title
    Title {
        /// Clip title as shown on the listing page
        #[arg(value_name = "TITLE")]
        title: String,
    },
}

/// Arguments for configuration management
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ConfigAction {
    /// Set and create the output directory
    OutputDir {
        /// New output directory; `~` is expanded
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// Print the effective configuration
    Show,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level from the flags, else from `configured`
    ///
    /// Unknown configured levels fall back to info.
    pub fn log_level(&self, configured: &str) -> tracing::Level {
        if self.global.quiet {
            tracing::Level::ERROR
        } else if self.global.very_verbose {
            tracing::Level::DEBUG
        } else if self.global.verbose {
            tracing::Level::INFO
        } else {
            configured.parse().unwrap_or(tracing::Level::INFO)
        }
    }
}
