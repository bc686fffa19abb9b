//! Configuration management for Clip Fetcher
//!
//! This module provides unified configuration management with automatic
//! first-run initialization, multi-source loading and zero-config defaults.
//! Durations are written as human strings (`"30s"`, `"1s"`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::app::{ClientConfig, WorkerConfig};
use crate::constants::{config as paths, env, files, http, limits, site, workers};
use crate::errors::{ConfigError, ConfigResult};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Download and output settings
    pub download: DownloadConfigToml,
    /// Listing page and resolution feed settings
    pub scraping: ScrapingConfigToml,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// TOML-friendly download configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DownloadConfigToml {
    /// Number of concurrent download workers
    pub concurrent_workers: usize,
    /// Transfer attempts per clip
    pub retry_attempts: u32,
    /// Per-request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Linear backoff unit between attempts
    #[serde(with = "humantime_serde")]
    pub retry_backoff_unit: Duration,
    /// Output root; `~` is expanded on load
    pub output_directory: PathBuf,
}

impl Default for DownloadConfigToml {
    fn default() -> Self {
        Self {
            concurrent_workers: workers::DEFAULT_WORKER_COUNT,
            retry_attempts: limits::DEFAULT_RETRY_ATTEMPTS,
            timeout: http::DEFAULT_TIMEOUT,
            retry_backoff_unit: limits::RETRY_BACKOFF_UNIT,
            output_directory: PathBuf::from(files::DEFAULT_OUTPUT_DIR),
        }
    }
}

/// TOML-friendly scraping configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScrapingConfigToml {
    /// Listing page URL
    pub base_url: String,
    /// Resolution feed URL
    pub feed_url: String,
    /// Courtesy delay after each clip enrichment
    #[serde(with = "humantime_serde")]
    pub delay_between_requests: Duration,
    /// User agent for page and feed requests
    pub user_agent: String,
    /// Client-side request rate (requests per second)
    pub rate_limit_rps: u32,
}

impl Default for ScrapingConfigToml {
    fn default() -> Self {
        Self {
            base_url: site::LISTING_URL.to_string(),
            feed_url: site::FEED_URL.to_string(),
            delay_between_requests: limits::DEFAULT_REQUEST_DELAY,
            user_agent: http::USER_AGENT.to_string(),
            rate_limit_rps: limits::DEFAULT_RATE_LIMIT_RPS,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level for the application
    pub level: String,
    /// Log file path; stderr when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Load configuration with multi-source precedence:
    /// 1. Default values
    /// 2. Config file (explicit path, else the standard locations)
    /// 3. Environment variables
    ///
    /// The output directory has `~` expanded afterwards.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an explicit file is missing, a file cannot
    /// be read or parsed, or an environment override is malformed
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        let config_path = match config_file_override {
            Some(path) if path.exists() => Some(path),
            Some(path) => return Err(ConfigError::NotFound { path }),
            None => Self::find_config_file(),
        };

        let mut config = match config_path {
            Some(path) => Self::load_from_file(&path).await?,
            None => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.download.output_directory = expand_tilde(&config.download.output_directory);

        Ok(config)
    }

    /// Apply environment-style overrides from `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(env::OUTPUT_DIR).filter(|v| !v.trim().is_empty()) {
            debug!("Output directory overridden by {}", env::OUTPUT_DIR);
            self.download.output_directory = PathBuf::from(dir.trim());
        }

        if let Some(raw) = lookup(env::WORKERS) {
            let count = raw
                .trim()
                .parse::<usize>()
                .map_err(|e| ConfigError::InvalidValue {
                    field: env::WORKERS.to_string(),
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
            debug!("Worker count overridden by {}", env::WORKERS);
            self.download.concurrent_workers = count;
        }

        Ok(())
    }

    /// Check every value the runtime relies on
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending field
    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = |field: &str, value: String, reason: &str| ConfigError::InvalidValue {
            field: field.to_string(),
            value,
            reason: reason.to_string(),
        };

        let count = self.download.concurrent_workers;
        if count == 0 || count > workers::MAX_WORKER_COUNT {
            return Err(invalid(
                "download.concurrent_workers",
                count.to_string(),
                "Must be between 1 and 64",
            ));
        }

        if self.download.retry_attempts == 0 {
            return Err(invalid(
                "download.retry_attempts",
                "0".to_string(),
                "At least one attempt is required",
            ));
        }

        if self.scraping.user_agent.trim().is_empty() {
            return Err(invalid(
                "scraping.user_agent",
                String::new(),
                "User agent cannot be empty",
            ));
        }

        if self.scraping.rate_limit_rps == 0 {
            return Err(invalid(
                "scraping.rate_limit_rps",
                "0".to_string(),
                "Rate limit must be non-zero",
            ));
        }

        for (field, value) in [
            ("scraping.base_url", &self.scraping.base_url),
            ("scraping.feed_url", &self.scraping.feed_url),
        ] {
            Url::parse(value).map_err(|e| invalid(field, value.clone(), &e.to_string()))?;
        }

        Ok(())
    }

    /// Runtime HTTP client configuration
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            user_agent: self.scraping.user_agent.clone(),
            request_timeout: self.download.timeout,
            rate_limit_rps: self.scraping.rate_limit_rps,
            ..ClientConfig::default()
        }
    }

    /// Runtime worker configuration
    pub fn worker_config(&self) -> WorkerConfig {
        WorkerConfig {
            worker_count: self.download.concurrent_workers,
            retry_attempts: self.download.retry_attempts,
            backoff_unit: self.download.retry_backoff_unit,
            download_timeout: self.download.timeout,
        }
    }

    /// Persist the configuration as TOML, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if serialization or writing fails
    pub async fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| ConfigError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        tokio::fs::write(path, content)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        info!("Saved configuration to: {}", path.display());
        Ok(())
    }

    /// Initialize configuration on first run
    ///
    /// Creates a commented default config file in the user config directory
    /// if no config file exists anywhere yet.
    pub async fn initialize_first_run() -> ConfigResult<Option<PathBuf>> {
        if let Some(existing) = Self::find_config_file() {
            return Ok(Some(existing));
        }

        let config_path = Self::get_default_config_path()?;
        info!("Creating default configuration file...");

        if let Some(parent) = config_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| ConfigError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        tokio::fs::write(&config_path, Self::generate_default_config_content())
            .await
            .map_err(|source| ConfigError::Io {
                path: config_path.clone(),
                source,
            })?;

        println!("📁 Created default configuration file:");
        println!("   {}", config_path.display());
        println!("   You can customize settings by editing this file.");
        println!();

        Ok(Some(config_path))
    }

    /// File that `config` subcommands write to
    ///
    /// The explicit path if given, else the first existing standard file,
    /// else the user config path.
    pub fn target_config_path(explicit: Option<PathBuf>) -> ConfigResult<PathBuf> {
        match explicit.or_else(Self::find_config_file) {
            Some(path) => Ok(path),
            None => Self::get_default_config_path(),
        }
    }

    /// Configuration stored in `path` alone, without environment overrides
    ///
    /// A missing file yields the defaults, so `config` subcommands can
    /// create it.
    pub async fn load_file_only(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            Self::load_from_file(path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(paths::LOCAL_FILE)];
        if let Ok(user) = Self::get_default_config_path() {
            search_paths.push(user);
        }

        let found = search_paths.into_iter().find(|path| path.exists());
        match &found {
            Some(path) => debug!("Found config file: {}", path.display()),
            None => debug!("No config file found in standard locations"),
        }
        found
    }

    /// Get the default config file path for the current user
    fn get_default_config_path() -> ConfigResult<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::MissingDirectory {
            which: "user config",
        })?;

        Ok(config_dir.join(paths::APP_DIR).join(paths::FILE_NAME))
    }

    /// Load configuration from a TOML file
    async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let config: AppConfig = toml::from_str(&content)?;

        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Generate default configuration content with helpful comments
    fn generate_default_config_content() -> String {
        format!(
            r#"# Clip Fetcher Configuration
# This file was automatically generated on first run.
# You can customize any of these settings to suit your needs.

[download]
# Number of clips downloaded in parallel
concurrent_workers = {workers}

# Attempts per clip; attempt n is followed by a wait of n backoff units
retry_attempts = {retries}
retry_backoff_unit = "1s"

# Per-request timeout
timeout = "30s"

# Where clips are saved, one sub-directory per year
output_directory = "{output}"

[scraping]
base_url = "{base_url}"
feed_url = "{feed_url}"

# Pause after resolving each clip
delay_between_requests = "1s"
user_agent = "{user_agent}"
rate_limit_rps = {rps}

[logging]
level = "info"  # error, warn, info, debug, trace
# log_file = "clip-fetcher.log"  # Uncomment to log to a file
"#,
            workers = workers::DEFAULT_WORKER_COUNT,
            retries = limits::DEFAULT_RETRY_ATTEMPTS,
            output = files::DEFAULT_OUTPUT_DIR,
            base_url = site::LISTING_URL,
            feed_url = site::FEED_URL,
            user_agent = http::USER_AGENT,
            rps = limits::DEFAULT_RATE_LIMIT_RPS,
        )
    }
}

/// Expand a leading `~` to the user's home directory
pub fn expand_tilde(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_creation() {
        let config = AppConfig::default();

        assert_eq!(config.download.concurrent_workers, workers::DEFAULT_WORKER_COUNT);
        assert_eq!(config.download.retry_attempts, 3);
        assert_eq!(config.download.timeout, Duration::from_secs(30));
        assert_eq!(config.scraping.delay_between_requests, Duration::from_secs(1));
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_file_generation() {
        let content = AppConfig::generate_default_config_content();

        let parsed: AppConfig = toml::from_str(&content).unwrap();

        assert_eq!(parsed, AppConfig::default());
        assert!(content.contains("# Clip Fetcher Configuration"));
        assert!(content.contains("[download]"));
        assert!(content.contains("[scraping]"));
    }

    #[tokio::test]
    async fn test_config_loading_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let result = AppConfig::load(Some(config_path)).await;
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_config_loading_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("clip-fetcher.toml");

        let test_config = r#"
[download]
concurrent_workers = 4
retry_backoff_unit = "250ms"
output_directory = "/srv/clips"

[logging]
level = "debug"
"#;
        tokio::fs::write(&config_path, test_config).await.unwrap();

        let config = AppConfig::load_from_file(&config_path).await.unwrap();

        assert_eq!(config.download.concurrent_workers, 4);
        assert_eq!(config.download.retry_backoff_unit, Duration::from_millis(250));
        assert_eq!(config.download.output_directory, PathBuf::from("/srv/clips"));
        assert_eq!(config.logging.level, "debug");
        // Unspecified values keep their defaults
        assert_eq!(config.download.retry_attempts, limits::DEFAULT_RETRY_ATTEMPTS);
        assert_eq!(config.scraping.rate_limit_rps, limits::DEFAULT_RATE_LIMIT_RPS);
    }

    #[tokio::test]
    async fn test_invalid_toml_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        tokio::fs::write(&config_path, "[download\nconcurrent_workers = ")
            .await
            .unwrap();

        let result = AppConfig::load(Some(config_path)).await;
        assert!(matches!(result, Err(ConfigError::InvalidFormat(_))));
    }

    #[tokio::test]
    async fn test_save_then_load_preserves_values() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.download.output_directory = PathBuf::from("/data/clips");
        config.logging.log_file = Some(PathBuf::from("clip-fetcher.log"));
        config.save(&config_path).await.unwrap();

        let loaded = AppConfig::load_from_file(&config_path).await.unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_overrides_apply() {
        let vars = HashMap::from([
            (env::OUTPUT_DIR, "/override/clips"),
            (env::WORKERS, " 2 "),
        ]);
        let mut config = AppConfig::default();

        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.download.output_directory, PathBuf::from("/override/clips"));
        assert_eq!(config.download.concurrent_workers, 2);
    }

    #[test]
    fn test_malformed_worker_override_is_rejected() {
        let mut config = AppConfig::default();
        let result = config.apply_overrides(|key| (key == env::WORKERS).then(|| "many".to_string()));

        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.download.concurrent_workers = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.scraping.feed_url = "not a url".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "scraping.feed_url"
        ));

        let mut config = AppConfig::default();
        config.scraping.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_runtime_views() {
        let mut config = AppConfig::default();
        config.download.concurrent_workers = 3;
        config.download.timeout = Duration::from_secs(5);
        config.scraping.user_agent = "Test/1.0".to_string();

        let client = config.client_config();
        assert_eq!(client.user_agent, "Test/1.0");
        assert_eq!(client.request_timeout, Duration::from_secs(5));

        let worker = config.worker_config();
        assert_eq!(worker.worker_count, 3);
        assert_eq!(worker.download_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_tilde(Path::new("/abs/path")), PathBuf::from("/abs/path"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde(Path::new("~/Music")), home.join("Music"));
        }
    }
}
