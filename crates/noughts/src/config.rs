//! Application configuration loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use noughts_store::{PlayerSetup, StoreSettings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Settings for a play session.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Config {
    /// Pause before the computer's move is applied, in milliseconds.
    #[serde(default = "default_thinking_delay_ms")]
    thinking_delay_ms: u64,

    /// Fixed seed for the computer opponent.
    #[serde(default)]
    seed: Option<u64>,

    /// File receiving trace output while the terminal is in use.
    #[serde(default = "default_log_file")]
    log_file: PathBuf,

    /// Filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    log_filter: String,

    /// Values pre-filled into the setup form.
    #[serde(default)]
    setup: PlayerSetup,
}

#[instrument]
fn default_thinking_delay_ms() -> u64 {
    500
}

#[instrument]
fn default_log_file() -> PathBuf {
    PathBuf::from("noughts.log")
}

#[instrument]
fn default_log_filter() -> String {
    "info,noughts_store=debug".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thinking_delay_ms: default_thinking_delay_ms(),
            seed: None,
            log_file: default_log_file(),
            log_filter: default_log_filter(),
            setup: PlayerSetup::default(),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(thinking_delay_ms = config.thinking_delay_ms, "Config loaded successfully");
        Ok(config)
    }

    /// Loads the file when present, otherwise falls back to defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Applies command-line overrides.
    #[instrument(skip(self))]
    pub fn with_overrides(mut self, seed: Option<u64>, thinking_delay_ms: Option<u64>) -> Self {
        if let Some(seed) = seed {
            info!(seed, "Overriding seed");
            self.seed = Some(seed);
        }
        if let Some(delay) = thinking_delay_ms {
            info!(delay, "Overriding thinking delay");
            self.thinking_delay_ms = delay;
        }
        self
    }

    /// Store settings derived from this configuration.
    pub fn store_settings(&self) -> StoreSettings {
        let settings = StoreSettings::default()
            .with_thinking_delay(Duration::from_millis(self.thinking_delay_ms));
        match self.seed {
            Some(seed) => settings.with_seed(seed),
            None => settings,
        }
    }

    /// Renders the configuration as TOML.
    #[instrument(skip(self))]
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string(self)
            .map_err(|e| ConfigError::new(format!("Failed to serialize config: {}", e)))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
