//! Hearth CLI Configuration Management
//!
//! Configuration is layered with figment, lowest priority first:
//! - built-in defaults
//! - `hearth.toml` in the working directory
//! - the file passed with `--config`
//! - `HEARTH_*` environment variables, nested with `__`
//!   (for example `HEARTH_POLLER__POLL_INTERVAL_MS=5000`)

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use hearth_core::{BackendConfig, HearthConfig, NotificationConfig, PollerConfig};

// ----------------------------------------------------------------------------
// CLI Application Configuration
// ----------------------------------------------------------------------------

/// Complete configuration for the `hearth` binary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliAppConfig {
    pub backend: BackendConfig,
    pub poller: PollerConfig,
    pub notifications: NotificationConfig,
    pub cli: CliConfig,
}

/// Options that only matter to the command-line front end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Enable verbose logging output
    pub verbose: bool,

    /// Log level when not verbose (`error`, `warn`, `info`, `debug`, `trace`)
    pub log_level: String,

    /// Snapshots `hearth watch` prints before exiting; 0 runs until Ctrl+C
    pub watch_ticks: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            log_level: "info".to_string(),
            watch_ticks: 3,
        }
    }
}

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// ----------------------------------------------------------------------------
// Configuration Loading Logic
// ----------------------------------------------------------------------------

impl CliAppConfig {
    pub const FILE_NAME: &'static str = "hearth.toml";
    pub const ENV_PREFIX: &'static str = "HEARTH_";

    /// Load defaults, `hearth.toml`, an optional explicit file, then the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(Self::FILE_NAME));

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::Loading(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }

        let config: CliAppConfig = figment
            .merge(Env::prefixed(Self::ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigError::Loading(format!("Failed to load configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Runtime configuration carried by this file
    pub fn hearth_config(&self) -> HearthConfig {
        HearthConfig {
            backend: self.backend.clone(),
            poller: self.poller.clone(),
            notifications: self.notifications.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.hearth_config()
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        if !LOG_LEVELS.contains(&self.cli.log_level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Validation(format!(
                "Unknown log level: {}",
                self.cli.log_level
            )));
        }

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialization(format!("Failed to serialize config: {}", e)))
    }
}

// ----------------------------------------------------------------------------
// Error Types
// ----------------------------------------------------------------------------

/// Configuration-related errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration loading error: {0}")]
    Loading(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}
