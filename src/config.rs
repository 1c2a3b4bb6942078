//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::{Backoff, ClientConfig, DEFAULT_API_BASE};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub identity: IdentityConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend access configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub list_retries: u32,

    #[serde(default = "default_issue_retries")]
    pub issue_retries: u32,

    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,

    #[serde(default)]
    pub retry_backoff: Backoff,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_issue_retries() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    1000
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            list_retries: 0,
            issue_retries: default_issue_retries(),
            retry_delay_ms: default_retry_delay(),
            retry_backoff: Backoff::default(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Where the user key is kept
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    #[serde(default = "default_store_path")]
    pub store_path: String,
}

fn default_store_path() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("watchml").join("storage.json").to_string_lossy().to_string())
        .unwrap_or_else(|| "./watchml_storage.json".to_string())
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
        }
    }
}

impl IdentityConfig {
    /// Store path with a leading `~/` expanded to the home directory
    pub fn resolved_store_path(&self) -> PathBuf {
        match (self.store_path.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => PathBuf::from(&self.store_path),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let (config, source) = Self::discover();
        source.log();
        config
    }

    /// Search the default locations without logging, reporting where the
    /// configuration came from and which files were skipped
    pub fn discover() -> (Self, ConfigSource) {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("watchml").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        let mut skipped = Vec::new();
        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        return (
                            config,
                            ConfigSource::File {
                                path: path.clone(),
                                skipped,
                            },
                        );
                    }
                    Err(e) => skipped.push(e),
                }
            }
        }

        (Self::from_env(), ConfigSource::Defaults { skipped })
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("WATCHML_API_URL") {
            self.api.base_url = url;
        }
        if let Some(n) = env_parse("WATCHML_LIST_RETRIES") {
            self.api.list_retries = n;
        }
        if let Some(n) = env_parse("WATCHML_ISSUE_RETRIES") {
            self.api.issue_retries = n;
        }

        if let Ok(path) = std::env::var("WATCHML_STORE_PATH") {
            self.identity.store_path = path;
        }

        if let Ok(level) = std::env::var("WATCHML_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("WATCHML_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Backend client settings derived from `[api]`
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api.base_url.clone(),
            list_retries: self.api.list_retries,
            issue_retries: self.api.issue_retries,
            retry_policy: self
                .api
                .retry_backoff
                .with_delay(Duration::from_millis(self.api.retry_delay_ms)),
            request_timeout: Duration::from_secs(self.api.request_timeout_secs),
        }
    }
}

fn env_parse(name: &str) -> Option<u32> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

/// Where [`Config::discover`] found its settings
#[derive(Debug)]
pub enum ConfigSource {
    File {
        path: PathBuf,
        skipped: Vec<ConfigError>,
    },
    Defaults {
        skipped: Vec<ConfigError>,
    },
}

impl ConfigSource {
    /// Files that existed but failed to load
    pub fn skipped(&self) -> &[ConfigError] {
        match self {
            ConfigSource::File { skipped, .. } | ConfigSource::Defaults { skipped } => skipped,
        }
    }

    /// Report the outcome through `tracing`
    pub fn log(&self) {
        for e in self.skipped() {
            tracing::warn!("Failed to load config: {}", e);
        }
        match self {
            ConfigSource::File { path, .. } => tracing::info!("Loaded config from {:?}", path),
            ConfigSource::Defaults { .. } => {
                tracing::info!("Using default config with environment overrides")
            }
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# WatchML Configuration
#
# Environment variables override these settings:
# - WATCHML_API_URL
# - WATCHML_LIST_RETRIES
# - WATCHML_ISSUE_RETRIES
# - WATCHML_STORE_PATH
# - WATCHML_LOG_LEVEL
# - WATCHML_LOG_FORMAT

[api]
# Backend base URL
base_url = "http://test.marc-julian.de"

# Retries when listing recordings (0 = single attempt)
list_retries = 0

# Retries when requesting a new user key
issue_retries = 3

# Delay between retries (ms)
retry_delay_ms = 1000

# Backoff shape: fixed or quadratic
retry_backoff = "fixed"

# Request timeout in seconds
request_timeout_secs = 30

[identity]
# File holding the cached user key
store_path = "~/.local/share/watchml/storage.json"

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
