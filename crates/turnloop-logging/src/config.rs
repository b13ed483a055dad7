//! Configuration file support for turnloop.
//!
//! Loads configuration from `turnloop.toml` in a given directory.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use turnloop_core::StateIdentity;

use crate::{default_log_dir, LogFormat, Logger};

/// The config file name
pub const CONFIG_FILE_NAME: &str = "turnloop.toml";

/// Top-level configuration loaded from `turnloop.toml`
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TurnloopConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// The `[logging]` section
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Tracing filter level (e.g. "info", "debug")
    pub level: Option<String>,
    /// Console format for loop events
    pub format: Option<LogFormat>,
    /// Write a JSONL session file per run
    pub file: Option<bool>,
    /// Directory for session files and rolling logs
    pub dir: Option<PathBuf>,
}

impl TurnloopConfig {
    /// Load configuration from `dir`.
    ///
    /// Returns:
    /// - `Ok(Some(config))` if file exists and parses successfully
    /// - `Ok(None)` if file does not exist
    /// - `Err(...)` if file exists but fails to parse (hard error)
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: TurnloopConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        Ok(Some(config))
    }
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }

    pub fn format(&self) -> LogFormat {
        self.format.unwrap_or_default()
    }

    pub fn file_enabled(&self) -> bool {
        self.file.unwrap_or(false)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(default_log_dir)
    }

    /// Build the [`Logger`] this configuration describes for one run
    pub fn build_logger(&self, identity: &StateIdentity) -> Result<Logger> {
        if !self.file_enabled() {
            return Ok(Logger::new(self.format()));
        }

        let dir = self.log_dir();
        Logger::with_session(self.format(), &dir, identity)
            .with_context(|| format!("Failed to create session log in {}", dir.display()))
    }
}
