//! Configuration management for RetroScroll

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};

pub const DEFAULT_BATCH_SIZE: usize = 20;
pub const DEFAULT_SCROLL_THRESHOLD: f64 = 0.8;
pub const DEFAULT_LATENCY_MS: u64 = 500;
const FALLBACK_STORAGE_PATH: &str = "~/.local/share/retroscroll";
pub const DEFAULT_NAMESPACE: &str = "retroScroll";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub content: ContentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeedConfig {
    /// Items appended per batch load
    pub batch_size: usize,
    /// Fraction of the sentinel that must be visible to trigger a load
    pub scroll_threshold: f64,
    /// Simulated network latency in milliseconds
    pub latency_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub path: String,
    pub namespace: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContentConfig {
    /// Seed for the content generator. Absent means entropy-seeded.
    pub seed: Option<u64>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
            latency_ms: DEFAULT_LATENCY_MS,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

/// Platform data directory, or the XDG default when none is known
fn default_storage_path() -> String {
    resolve_data_path()
        .map(|path| path.to_string_lossy().into_owned())
        .unwrap_or_else(|_| FALLBACK_STORAGE_PATH.to_string())
}

impl FeedConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

impl Config {
    /// Load configuration from the default location
    ///
    /// A missing config file is not an error: the defaults are used instead.
    /// Environment overrides are applied last.
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        let mut config = if config_path.exists() {
            Self::load_from_path(&config_path)?
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            Self::default_config()
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Create a default configuration
    pub fn default_config() -> Self {
        Self {
            feed: FeedConfig::default(),
            storage: StorageConfig::default(),
            content: ContentConfig::default(),
        }
    }

    /// Reject values the feed pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.feed.batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "feed.batch_size".to_string(),
                reason: "must be greater than zero".to_string(),
            }
            .into());
        }

        let threshold = self.feed.scroll_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::InvalidValue {
                field: "feed.scroll_threshold".to_string(),
                reason: format!("{} is outside (0, 1]", threshold),
            }
            .into());
        }

        if self.storage.namespace.trim().is_empty() {
            return Err(ConfigError::MissingField("storage.namespace".to_string()).into());
        }

        Ok(())
    }

    /// Apply `RETROSCROLL_FEED_LATENCY` (humantime format, e.g. "250ms")
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(raw) = std::env::var("RETROSCROLL_FEED_LATENCY") {
            let latency = humantime::parse_duration(raw.trim()).map_err(|e| {
                ConfigError::InvalidValue {
                    field: "RETROSCROLL_FEED_LATENCY".to_string(),
                    reason: e.to_string(),
                }
            })?;
            self.feed.latency_ms =
                u64::try_from(latency.as_millis()).map_err(|_| ConfigError::InvalidValue {
                    field: "RETROSCROLL_FEED_LATENCY".to_string(),
                    reason: format!("{} does not fit in milliseconds", raw.trim()),
                })?;
        }
        Ok(())
    }

    /// Storage directory with `~` expanded
    pub fn storage_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.storage.path).to_string())
    }
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("RETROSCROLL_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("retroscroll").join("config.toml"))
}

/// Resolve the data directory path following XDG Base Directory spec
pub fn resolve_data_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| ConfigError::MissingField("data directory".to_string()))?;

    Ok(data_dir.join("retroscroll"))
}
