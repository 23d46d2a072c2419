//! TOML-based application configuration.
//!
//! Stores user defaults applied when a caller does not say otherwise:
//! - anchor weekday for new weekly trackers
//! - anchor day-of-month for new monthly trackers
//! - number of periods shown by history/chart views
//!
//! Configuration is stored at `~/.config/trackle/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;
use crate::ledger::DEFAULT_HISTORY_LIMIT;
use crate::period::Weekday;

/// Defaults for newly created trackers and history views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_week_start")]
    pub week_start: Weekday,
    #[serde(default = "default_month_start")]
    pub month_start_date: u32,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/trackle/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

fn default_week_start() -> Weekday {
    Weekday::Mon
}
fn default_month_start() -> u32 {
    1
}
fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            week_start: default_week_start(),
            month_start_date: default_month_start(),
            history_limit: default_history_limit(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            defaults: DefaultsConfig::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/trackle"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load the configuration, falling back to defaults when the file
    /// does not exist yet.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Write the configuration back to disk.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let text = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, text).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })
    }
}
