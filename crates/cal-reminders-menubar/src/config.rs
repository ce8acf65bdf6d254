//! JSON configuration.
//!
//! A single flat `config.json` at `~/.config/cal-reminders/config.json`.
//! Values are merged key-by-key over built-in defaults, so a file that only
//! sets `lookahead_hours` still gets the default refresh interval. Keys this
//! build does not know about are kept and written back on save, which lets
//! newer and older builds share one file.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{MenubarError, MenubarResult};

/// Default seconds between event fetches.
pub const DEFAULT_REFRESH_INTERVAL_SECONDS: u64 = 60;

/// Default hours of lookahead per fetch.
pub const DEFAULT_LOOKAHEAD_HOURS: u32 = 8;

/// Configuration for the menu-bar app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seconds between event fetches.
    pub refresh_interval_seconds: u64,

    /// How many hours ahead each fetch looks.
    pub lookahead_hours: u32,

    /// Restrict fetching to calendars with these titles. `None` means all.
    pub enabled_calendars: Option<BTreeSet<String>>,

    /// Keys this build does not know; kept so a round trip never drops them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval_seconds: DEFAULT_REFRESH_INTERVAL_SECONDS,
            lookahead_hours: DEFAULT_LOOKAHEAD_HOURS,
            enabled_calendars: None,
            extra: Map::new(),
        }
    }
}

impl Config {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.json")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("cal-reminders")
    }

    /// Loads configuration from the given path.
    ///
    /// A missing file is the normal first-run case and yields defaults. An
    /// unreadable or malformed file also yields defaults, with a warning,
    /// so a broken config never takes the menu bar item down.
    pub fn load(path: &Path) -> Self {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Self::default();
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read config, using defaults");
                return Self::default();
            }
        };

        match serde_json::from_str(&data) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "malformed config, using defaults");
                Self::default()
            }
        }
    }

    /// Writes this configuration to the given path as pretty JSON,
    /// creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if serialization fails and an `Io` error if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> MenubarResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| MenubarError::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(path, json)?;

        debug!(path = %path.display(), "wrote config");
        Ok(())
    }
}
