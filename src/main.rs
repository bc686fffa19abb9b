//! Clip Fetcher CLI application
//!
//! Command-line interface for mirroring published music clips into a
//! year-organized folder. Features concurrent downloads, title-based link
//! resolution and atomic file writes.

use std::fs::OpenOptions;
use std::process;
use std::sync::Mutex;

use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use clip_fetcher::cli::{
    failure_message, handle_check, handle_config, handle_download, Cli, Commands,
};
use clip_fetcher::config::{expand_tilde, AppConfig, LoggingConfig};
use clip_fetcher::errors::Result;

#[tokio::main]
async fn main() {
    // Initialize program
    let result = run().await;

    // Handle any errors that occurred
    if let Err(e) = result {
        eprintln!("{}", failure_message(&e));
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();

    if cli.global.config.is_none() {
        AppConfig::initialize_first_run().await?;
    }
    let mut config = AppConfig::load(cli.global.config.clone()).await?;
    if let Some(dir) = &cli.global.output_dir {
        config.download.output_directory = expand_tilde(dir);
    }

    init_logging(&cli, &config.logging);
    info!("Clip Fetcher v{} starting", env!("CARGO_PKG_VERSION"));

    config.validate()?;

    match cli.command {
        Commands::Download(args) => {
            info!("Executing download command");
            handle_download(args, &config, cli.global.quiet).await
        }
        Commands::Check => {
            info!("Executing check command");
            handle_check(&config).await
        }
        Commands::Config(args) => {
            info!("Executing config command");
            handle_config(args, &config, cli.global.config.clone()).await
        }
    }
}

/// Initialize logging from CLI verbosity, falling back to the configured level
fn init_logging(cli: &Cli, logging: &LoggingConfig) {
    let log_level = cli.log_level(&logging.level);

    let mut filter = EnvFilter::from_default_env();
    match format!("clip_fetcher={}", log_level.to_string().to_lowercase()).parse() {
        Ok(directive) => filter = filter.add_directive(directive),
        Err(e) => eprintln!("Ignoring log level directive: {}", e),
    }

    let log_file = logging.log_file.as_ref().map(|path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| (path.clone(), e))
    });

    match log_file {
        Some(Ok(file)) => {
            let _ = fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init();
        }
        other => {
            let _ = fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_level(cli.global.very_verbose) // Show levels only in very verbose mode
                .try_init();

            if let Some(Err((path, e))) = other {
                warn!("Could not open log file {}: {}", path.display(), e);
            }
        }
    }

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
