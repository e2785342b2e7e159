//! Configuration settings for the hockey tracker.

use crate::state::TrackedTeamEntry;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Prefix of environment variables overriding file settings,
/// e.g. `HOCKEY_TRACKER__TRACKER__SCAN_INTERVAL_SECS=300`.
const ENV_PREFIX: &str = "HOCKEY_TRACKER";
const ENV_SEPARATOR: &str = "__";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Catalog API configuration.
    pub api: ApiConfig,
    /// Polling configuration.
    pub tracker: TrackerSettings,
    /// Entry store configuration.
    pub storage: StorageConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Settings {
    /// Load settings from a TOML file layered with environment overrides.
    ///
    /// `None` reads `config.toml` in the platform config directory. A
    /// missing file is not an error; every key has a default.
    pub fn load(path: Option<PathBuf>) -> crate::Result<Self> {
        let config_path = path.unwrap_or_else(Self::default_path);

        config::Config::builder()
            .add_source(
                config::File::from(config_path)
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .and_then(|built| built.try_deserialize())
            .map_err(|e| crate::Error::config(e.to_string()))
    }

    /// Save settings to file.
    pub fn save(&self, path: Option<PathBuf>) -> crate::Result<()> {
        let config_path = path.unwrap_or_else(Self::default_path);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::config(e.to_string()))?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    fn default_path() -> PathBuf {
        super::config_dir()
            .map(|p| p.join("config.toml"))
            .unwrap_or_else(|_| PathBuf::from("config.toml"))
    }
}

/// Catalog API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// HockeyWeerelt publication API base URL.
    pub base_url: String,
    /// Request timeout in seconds. Unset leaves the HTTP client default.
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://publicaties.hockeyweerelt.nl".to_string(),
            timeout_secs: None,
        }
    }
}

impl ApiConfig {
    /// Request timeout, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Polling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerSettings {
    /// Interval between two sensor updates, in seconds.
    pub scan_interval_secs: u64,
    /// Teams tracked straight from the settings file, next to stored entries.
    pub teams: Vec<TrackedTeamEntry>,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            scan_interval_secs: 600,
            teams: Vec::new(),
        }
    }
}

impl TrackerSettings {
    /// Scan interval as a duration (never zero).
    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs.max(1))
    }
}

/// Entry store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the entry store. Defaults to `entries.json` in the data directory.
    pub entries_path: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the entry store path.
    pub fn entries_path(&self) -> crate::Result<PathBuf> {
        match &self.entries_path {
            Some(path) => Ok(path.clone()),
            None => super::data_dir().map(|dir| dir.join("entries.json")),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    pub filter: String,
    /// Also write logs to a daily rolling file in the log directory.
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "hockey_tracker=info".to_string(),
            file: false,
        }
    }
}
