//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::args::CliArgs;
use crate::infrastructure::giphy::GIPHY_SEARCH_ENDPOINT;

pub(super) const APP_NAME: &str = "gifstash";
pub(super) const APP_QUALIFIER: &str = "com";
pub(super) const APP_ORGANIZATION: &str = "gifstash";

/// Results requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Search provider configuration.
    #[serde(default)]
    pub giphy: GiphyConfig,

    /// Original cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Search provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GiphyConfig {
    /// Search endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API key sent with every search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Results requested per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Request timeout in seconds, for searches and downloads.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GiphyConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Original cache configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache directory. Defaults to `CachedOriginals` under the system temp dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

fn default_endpoint() -> String {
    GIPHY_SEARCH_ENDPOINT.to_string()
}

const fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

const fn default_timeout_secs() -> u64 {
    30
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(api_key) = &args.api_key {
            self.giphy.api_key = Some(api_key.clone());
        }
        if let Some(cache_dir) = &args.cache_dir {
            self.cache.directory = Some(cache_dir.clone());
        }
        if let Some(timeout) = args.timeout {
            self.giphy.timeout_secs = timeout;
        }
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("gifstash.log"))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }

    /// Returns effective cache directory.
    #[must_use]
    pub fn effective_cache_dir(&self) -> PathBuf {
        self.cache
            .directory
            .clone()
            .unwrap_or_else(crate::infrastructure::cache::default_cache_dir)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::Info,
            giphy: GiphyConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
            log_level = "debug"

            [giphy]
            api_key = "abc"
            page_size = 25
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.giphy.api_key.as_deref(), Some("abc"));
        assert_eq!(config.giphy.page_size, 25);
        assert_eq!(config.giphy.endpoint, GIPHY_SEARCH_ENDPOINT);
        assert_eq!(config.giphy.timeout_secs, 30);
        assert!(config.cache.directory.is_none());
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.giphy.page_size, DEFAULT_PAGE_SIZE);
        assert!(config.giphy.api_key.is_none());
        assert!(
            config
                .effective_cache_dir()
                .ends_with(crate::infrastructure::cache::CACHE_DIR_NAME)
        );
    }

    #[test]
    fn test_args_override_file_values() {
        let mut config: AppConfig = toml::from_str(
            r#"
            [giphy]
            api_key = "from-file"
            timeout_secs = 10

            [cache]
            directory = "/var/cache/gifs"
        "#,
        )
        .unwrap();

        let args = CliArgs::parse_from([
            "gifstash",
            "--api-key",
            "from-cli",
            "--log-level",
            "warn",
            "search",
            "cats",
        ]);
        config.merge_with_args(&args);

        assert_eq!(config.giphy.api_key.as_deref(), Some("from-cli"));
        assert_eq!(config.giphy.timeout_secs, 10);
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.effective_cache_dir(), PathBuf::from("/var/cache/gifs"));
    }
}
