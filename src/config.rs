//! Configuration
//!
//! Provides centralized configuration management with:
//! - Environment variable support
//! - Config file loading (optional)
//! - Runtime defaults
//! - Validation

use crate::client::DEFAULT_BASE_URL;
use crate::pagination::DEFAULT_PAGE_SIZE;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Largest page the invoices endpoint will serve.
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub api: ApiConfig,
    pub report: ReportConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub output: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub page_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Window used when no `--date` is given.
    pub lookback_days: i64,
    pub timestamp_format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub token_file: PathBuf,
    pub log_directory: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "WARN".to_string(),
            format: "pretty".to_string(),
            output: "console".to_string(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 15,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            lookback_days: 7,
            timestamp_format: "%b %e, %Y at %H:%M".to_string(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let app_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("boost-report");
        Self {
            token_file: app_dir.join("token"),
            log_directory: PathBuf::from("logs"),
        }
    }
}

impl Config {
    /// Load configuration from file, environment and defaults
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        let config_paths = [
            PathBuf::from("boost-report.toml"),
            PathBuf::from(".boost-report.toml"),
            dirs::config_dir()
                .map(|d| d.join("boost-report").join("config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.is_file() {
                info!(config_file = %path.display(), "Loading configuration from file");
                config = Self::load_from_file(path)?;
                break;
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        // Logging overrides
        if let Ok(val) = env::var("LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = env::var("LOG_FORMAT") {
            self.logging.format = val;
        }
        if let Ok(val) = env::var("LOG_OUTPUT") {
            self.logging.output = val;
        }

        // API overrides
        if let Ok(val) = env::var("BOOST_REPORT_API_URL") {
            self.api.base_url = val;
        }
        if let Ok(val) = env::var("BOOST_REPORT_TIMEOUT_SECS") {
            self.api.timeout_secs = val.parse().context("Invalid BOOST_REPORT_TIMEOUT_SECS")?;
        }
        if let Ok(val) = env::var("BOOST_REPORT_PAGE_SIZE") {
            self.api.page_size = val.parse().context("Invalid BOOST_REPORT_PAGE_SIZE")?;
        }

        // Report overrides
        if let Ok(val) = env::var("BOOST_REPORT_LOOKBACK_DAYS") {
            self.report.lookback_days = val.parse().context("Invalid BOOST_REPORT_LOOKBACK_DAYS")?;
        }

        // Path overrides
        if let Ok(val) = env::var("BOOST_REPORT_TOKEN_FILE") {
            self.paths.token_file = PathBuf::from(val);
        }
        if let Ok(val) = env::var("BOOST_REPORT_LOG_DIR") {
            self.paths.log_directory = PathBuf::from(val);
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.page_size == 0 || self.api.page_size > MAX_PAGE_SIZE {
            return Err(anyhow::anyhow!(
                "Page size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE,
                self.api.page_size
            ));
        }

        if self.api.timeout_secs == 0 {
            return Err(anyhow::anyhow!("Request timeout must be greater than 0"));
        }

        if self.api.timeout_secs > 120 {
            warn!(
                timeout_secs = self.api.timeout_secs,
                "Request timeout is very long, a stalled page will hold up the report"
            );
        }

        reqwest::Url::parse(&self.api.base_url)
            .with_context(|| format!("Invalid API base URL: {}", self.api.base_url))?;

        if self.report.lookback_days < 0 {
            return Err(anyhow::anyhow!("Lookback days cannot be negative"));
        }

        if matches!(self.logging.output.as_str(), "file" | "both") && !self.paths.log_directory.exists() {
            fs::create_dir_all(&self.paths.log_directory).context("Failed to create log directory")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.logging.level, "WARN");
        assert_eq!(config.api.base_url, "https://api.getalby.com");
        assert_eq!(config.api.timeout_secs, 15);
        assert_eq!(config.api.page_size, 25);
        assert_eq!(config.report.lookback_days, 7);
        assert!(config.paths.token_file.ends_with("boost-report/token"));
    }

    // Both cases live in one test: apply_env_overrides reads every variable,
    // so parallel tests touching the environment would race.
    #[test]
    fn test_env_overrides() {
        env::set_var("BOOST_REPORT_PAGE_SIZE", "50");
        env::set_var("BOOST_REPORT_API_URL", "http://127.0.0.1:9999");
        let mut config = Config::default();
        let applied = config.apply_env_overrides();
        env::remove_var("BOOST_REPORT_PAGE_SIZE");
        env::remove_var("BOOST_REPORT_API_URL");

        assert!(applied.is_ok());
        assert_eq!(config.api.page_size, 50);
        assert_eq!(config.api.base_url, "http://127.0.0.1:9999");

        env::set_var("BOOST_REPORT_TIMEOUT_SECS", "soon");
        let mut config = Config::default();
        let result = config.apply_env_overrides();
        env::remove_var("BOOST_REPORT_TIMEOUT_SECS");

        assert!(result.is_err());
    }

    #[test]
    fn test_file_round_trip_and_partial_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boost-report.toml");

        let mut config = Config::default();
        config.api.page_size = 10;
        config.report.lookback_days = 30;
        fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.api.page_size, 10);
        assert_eq!(loaded.report.lookback_days, 30);

        let partial = dir.path().join("partial.toml");
        fs::write(&partial, "[api]\ntimeout_secs = 5\n").unwrap();
        let loaded = Config::load_from_file(&partial).unwrap();
        assert_eq!(loaded.api.timeout_secs, 5);
        assert_eq!(loaded.api.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(loaded.logging.level, "WARN");
    }

    #[test]
    fn test_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());

        let mut config = Config::default();
        config.api.page_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.api.page_size = MAX_PAGE_SIZE + 1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.report.lookback_days = -1;
        assert!(config.validate().is_err());
    }
}
