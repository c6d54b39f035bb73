//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/notecal/config.toml` by default. Every section and key is
//! optional.
//!
//! ```toml
//! [expansion]
//! horizon_days = 60
//! max_occurrences = 500
//!
//! [display]
//! no_meeting_text = "No active meeting"
//! time_format = "%H:%M"
//!
//! [watch]
//! interval_secs = 60
//!
//! [storage]
//! data_dir = "/home/me/.local/share/notecal"
//! ```

use std::path::{Path, PathBuf};

use notecal_ics::ExpansionLimits;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Configuration for the notecal client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Recurrence expansion bounds.
    pub expansion: ExpansionLimits,

    /// Display settings.
    pub display: DisplaySettings,

    /// Watch loop settings.
    pub watch: WatchSettings,

    /// Where the schedule is kept.
    pub storage: StorageSettings,
}

/// Display settings for output formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Text to show when no meeting is in progress.
    pub no_meeting_text: String,

    /// `strftime` format used for start and end times.
    pub time_format: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            no_meeting_text: "No active meeting".to_string(),
            time_format: notecal_core::time::CLOCK_FORMAT.to_string(),
        }
    }
}

/// Watch loop settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchSettings {
    /// Seconds between two prune passes.
    pub interval_secs: u64,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self { interval_secs: 60 }
    }
}

/// Storage settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding the saved schedule.
    pub data_dir: Option<PathBuf>,
}

impl ClientConfig {
    /// Loads configuration from the default path, or defaults if there is
    /// no file.
    pub fn load() -> ClientResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> ClientResult<Self> {
        toml::from_str(content)
            .map_err(|e| ClientError::config(format!("failed to parse config: {}", e)))
    }

    /// Returns the schedule directory.
    ///
    /// A directory given on the command line wins over `[storage] data_dir`,
    /// which wins over the platform data directory.
    pub fn data_dir(&self, cli_override: Option<&Path>) -> PathBuf {
        cli_override
            .map(Path::to_path_buf)
            .or_else(|| self.storage.data_dir.clone())
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("notecal")
    }

    /// Returns the default data directory path.
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("notecal")
    }
}
