//! Command handlers for Clip Fetcher CLI
//!
//! This module wires the configured capabilities into a
//! [`DownloadService`] and implements one handler per subcommand.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info};

use crate::app::{
    ClipScraper, DownloadService, FeedResolver, HttpDownloader, Item, ItemStore, LinkResolver,
    LocalStore,
};
use crate::cli::{BatchProgress, ConfigAction, ConfigArgs, DownloadArgs, DownloadTarget};
use crate::config::{expand_tilde, AppConfig};
use crate::errors::{AppError, ConfigError, Result};

/// Build the production pipeline from a validated configuration
///
/// One rate-limited HTTP handler is shared by the scraper, the resolver
/// and the downloader.
///
/// # Errors
///
/// Returns `AppError::Download` if the HTTP client or the worker
/// configuration is invalid
pub fn build_service(config: &AppConfig) -> Result<DownloadService> {
    let http = config.client_config().build_handler()?;

    let store: Arc<dyn ItemStore> =
        Arc::new(LocalStore::new(&config.download.output_directory));
    let resolver: Arc<dyn LinkResolver> = Arc::new(FeedResolver::new(
        http.clone(),
        config.scraping.feed_url.clone(),
    ));
    let scraper = ClipScraper::new(http.clone(), resolver)
        .with_delay(config.scraping.delay_between_requests);
    let downloader = HttpDownloader::new(config.worker_config(), http, store.clone())?;

    debug!(
        output = %config.download.output_directory.display(),
        workers = config.download.concurrent_workers,
        "Download service ready"
    );
    Ok(DownloadService::new(
        Arc::new(scraper),
        store,
        Arc::new(downloader),
    ))
}

/// Log a failed command and build the message shown on stderr
///
/// Transient failures get a hint that a later run may succeed.
pub fn failure_message(err: &AppError) -> String {
    error!(
        category = err.category(),
        recoverable = err.is_recoverable(),
        "Command failed: {}",
        err
    );

    if err.is_recoverable() {
        format!("Error: {}\n   This looks temporary; try again later.", err)
    } else {
        format!("Error: {}", err)
    }
}

/// Handle the download command
pub async fn handle_download(args: DownloadArgs, config: &AppConfig, quiet: bool) -> Result<()> {
    let service = build_service(config)?;

    match args.target {
        DownloadTarget::All => handle_download_all(&service, config, quiet).await,
        DownloadTarget::Title { title } => {
            handle_download_title(&service, config, &title, quiet).await
        }
    }
}

async fn handle_download_all(
    service: &DownloadService,
    config: &AppConfig,
    quiet: bool,
) -> Result<()> {
    if !quiet {
        println!(
            "📥 Downloading clips to {}",
            config.download.output_directory.display()
        );
        println!("   Workers: {}", config.download.concurrent_workers);
    }

    let progress = BatchProgress::new(!quiet);
    service.downloader().set_progress_callback(progress.callback());

    let start_time = Instant::now();
    let result = service.download_all(&config.scraping.base_url).await;
    let elapsed = start_time.elapsed();

    match &result {
        Ok(()) => progress.finish("done"),
        Err(_) => progress.finish("failed"),
    }
    result?;

    info!(
        downloaded = progress.position(),
        "Download completed in {:?}", elapsed
    );
    if !quiet {
        println!(
            "✅ Finished in {:.1}s ({} new clips)",
            elapsed.as_secs_f64(),
            progress.position()
        );
    }
    Ok(())
}

async fn handle_download_title(
    service: &DownloadService,
    config: &AppConfig,
    title: &str,
    quiet: bool,
) -> Result<()> {
    info!(title, "Downloading single clip");
    service
        .download_specific(&config.scraping.base_url, title)
        .await?;

    if !quiet {
        println!("✅ {} is in {}", title, config.download.output_directory.display());
    }
    Ok(())
}

/// Handle the check command: list clips that are not downloaded yet
pub async fn handle_check(config: &AppConfig) -> Result<()> {
    let service = build_service(config)?;
    let new_items = service.check_for_new(&config.scraping.base_url).await?;

    if new_items.is_empty() {
        println!("✅ All clips are already downloaded");
        return Ok(());
    }

    println!("🆕 {} new clips:", new_items.len());
    for (index, item) in new_items.iter().enumerate() {
        println!("{:>4}. {} [{}]", index + 1, item.title, year_label(item));
        println!("      {}", item.url);
    }
    println!();
    println!("Run 'clip_fetcher download all' to download them.");
    Ok(())
}

fn year_label(item: &Item) -> String {
    item.year
        .map(|year| year.to_string())
        .unwrap_or_else(|| "unknown year".to_string())
}

/// Handle the config command
///
/// `config_path` is the `--config` flag; changes are written there or to
/// the first standard config file.
pub async fn handle_config(
    args: ConfigArgs,
    config: &AppConfig,
    config_path: Option<PathBuf>,
) -> Result<()> {
    match args.action {
        ConfigAction::OutputDir { path } => handle_config_output_dir(&path, config_path).await,
        ConfigAction::Show => handle_config_show(config),
    }
}

/// Persist a new output directory
///
/// Starts from the stored file, not the effective configuration, so
/// environment and `--output-dir` overrides are never written back.
async fn handle_config_output_dir(
    path: &std::path::Path,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let output_dir = expand_tilde(path);
    tokio::fs::create_dir_all(&output_dir).await?;

    let target = AppConfig::target_config_path(config_path)?;
    let mut stored = AppConfig::load_file_only(&target).await?;
    stored.download.output_directory = output_dir.clone();
    stored.validate()?;
    stored.save(&target).await?;

    println!("📁 Output directory set to {}", output_dir.display());
    println!("   Saved to {}", target.display());
    Ok(())
}

fn handle_config_show(config: &AppConfig) -> Result<()> {
    let rendered = toml::to_string_pretty(config).map_err(ConfigError::from)?;
    println!("{}", rendered);
    Ok(())
}
