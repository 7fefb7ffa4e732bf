//! Configuration for libris
//!
//! Settings live in a TOML file:
//!
//! ```toml
//! [storage]
//! path = "data/library.json"
//! pretty = true
//!
//! [logging]
//! filter = "warn"
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable overriding [`StorageConfig::path`]
pub const DATA_PATH_ENV: &str = "LIBRIS_DATA";

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "libris.toml";

/// System-wide configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LibrisConfig {
    /// Where library state is stored
    pub storage: StorageConfig,
    /// Log output settings
    pub logging: LoggingConfig,
}

/// Snapshot file settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the JSON snapshot
    pub path: PathBuf,
    /// Pretty-print the snapshot
    pub pretty: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data").join("library.json"),
            pretty: true,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

impl LibrisConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Resolve configuration from standard locations
    ///
    /// Uses `explicit` if given, else `./libris.toml`, else
    /// `~/.libris/config.toml`, else defaults. `LIBRIS_DATA` then overrides
    /// the storage path.
    pub fn load_standard(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::standard_locations().into_iter().find(|p| p.exists()) {
                Some(path) => {
                    tracing::debug!("Using config file {:?}", path);
                    Self::from_file(path)?
                }
                None => Self::default(),
            },
        };

        if let Ok(data) = std::env::var(DATA_PATH_ENV) {
            if !data.trim().is_empty() {
                config.storage.path = PathBuf::from(data);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Candidate config files in priority order
    pub fn standard_locations() -> Vec<PathBuf> {
        let mut locations = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(home) = dirs::home_dir() {
            locations.push(home.join(".libris").join("config.toml"));
        }
        locations
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue(
                "storage.path must not be empty".to_string(),
            ));
        }
        if self.storage.path.file_name().is_none() {
            return Err(ConfigError::InvalidValue(format!(
                "storage.path {:?} must name a file",
                self.storage.path
            )));
        }
        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "logging.filter must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
