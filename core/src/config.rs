//! User configuration.
//!
//! Stores optional defaults in JSON format at `~/.snipe/config.json`.
//! Every key is optional; a missing file means all defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::adapters::KillTimings;
use crate::domain::DEFAULT_MAX_RANGE_SPAN;
use crate::error::{Error, Result};

/// Configuration data stored in JSON format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Kill gracefully even without `-g`.
    #[serde(default)]
    pub graceful: bool,

    /// Time a process gets to exit after SIGTERM, in milliseconds.
    #[serde(default = "default_grace_period_ms")]
    pub grace_period_ms: u64,

    /// Time to wait for death after SIGKILL, in milliseconds.
    #[serde(default = "default_force_wait_ms")]
    pub force_wait_ms: u64,

    /// Pause between liveness probes, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Widest accepted `start-end` port range.
    #[serde(default = "default_max_range_span")]
    pub max_range_span: u16,
}

fn default_grace_period_ms() -> u64 {
    2000
}

fn default_force_wait_ms() -> u64 {
    1000
}

fn default_poll_interval_ms() -> u64 {
    50
}

fn default_max_range_span() -> u16 {
    DEFAULT_MAX_RANGE_SPAN
}

impl Default for Config {
    fn default() -> Self {
        Self {
            graceful: false,
            grace_period_ms: default_grace_period_ms(),
            force_wait_ms: default_force_wait_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            max_range_span: default_max_range_span(),
        }
    }
}

impl Config {
    /// Termination deadlines described by this configuration.
    pub fn kill_timings(&self) -> KillTimings {
        KillTimings {
            grace_period: Duration::from_millis(self.grace_period_ms),
            force_wait: Duration::from_millis(self.force_wait_ms),
            // A zero interval would spin.
            poll_interval: Duration::from_millis(self.poll_interval_ms.max(1)),
        }
    }
}

/// Configuration store for reading user settings.
pub struct ConfigStore {
    /// Path to the configuration file.
    config_path: PathBuf,
}

impl ConfigStore {
    /// Create a new config store with the default path.
    ///
    /// Default path: `~/.snipe/config.json`
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;

        Ok(Self::with_path(home.join(".snipe").join("config.json")))
    }

    /// Create a config store with a custom path (for testing).
    pub fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    /// Path of the configuration file.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Load configuration from disk.
    ///
    /// Returns default config if the file doesn't exist.
    pub async fn load(&self) -> Result<Config> {
        if !fs::try_exists(&self.config_path).await.unwrap_or(false) {
            debug!(path = %self.config_path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }
}
