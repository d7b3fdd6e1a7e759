//! Host-side bridge configuration, read from a TOML file.
//!
//! ```toml
//! delivery = "channel"
//! executor_thread_name = "robot-host"
//! service_name = "robot-app"
//! log_format = "json"
//! ```
//!
//! Every key is optional.  Unknown keys are rejected so a typo does not
//! silently fall back to a default.

use std::fmt;
use std::fs;
use std::path::Path;

use mechbridge_core::{DEFAULT_EXECUTOR_NAME, DeliveryMode};
use mechbridge_types::BridgeError;
use serde::{Deserialize, Serialize};

/// Console log formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Compact => write!(f, "compact"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeConfig {
    /// How deliveries enter the host context.
    #[serde(default)]
    pub delivery: DeliveryMode,

    /// Name of the executor thread in channel mode.
    #[serde(default = "default_executor_thread_name")]
    pub executor_thread_name: String,

    /// Service name reported to the telemetry backend.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_executor_thread_name() -> String {
    DEFAULT_EXECUTOR_NAME.to_string()
}

fn default_service_name() -> String {
    "mechbridge".to_string()
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            delivery: DeliveryMode::default(),
            executor_thread_name: default_executor_thread_name(),
            service_name: default_service_name(),
            log_format: LogFormat::default(),
        }
    }
}

impl BridgeConfig {
    /// Parse a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Config`] on malformed TOML, unknown keys or
    /// unknown enum values.
    pub fn from_toml_str(raw: &str) -> Result<Self, BridgeError> {
        toml::from_str(raw).map_err(|e| BridgeError::Config(format!("Failed to parse config: {e}")))
    }

    /// Read and parse the config file at `path`, then apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Config`] when the file is missing, unreadable
    /// or invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BridgeError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            BridgeError::Config(format!("Failed to read config at {}: {e}", path.display()))
        })?;
        let mut cfg = Self::from_toml_str(&raw)?;
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    /// Write the config to `path` as pretty TOML.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Config`] when the file cannot be written.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), BridgeError> {
        let path = path.as_ref();
        let raw = toml::to_string_pretty(self)
            .map_err(|e| BridgeError::Config(format!("Failed to serialize config: {e}")))?;
        fs::write(path, raw).map_err(|e| {
            BridgeError::Config(format!("Failed to write config at {}: {e}", path.display()))
        })
    }

    /// Apply `MECHBRIDGE_*` environment overrides.
    ///
    /// | Variable | Field |
    /// |---|---|
    /// | `MECHBRIDGE_DELIVERY` | `delivery` (`inline` / `channel`) |
    /// | `MECHBRIDGE_LOG_FORMAT` | `log_format` (`compact` / `json`) |
    ///
    /// Values that do not parse are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("MECHBRIDGE_DELIVERY") {
            match v.as_str() {
                "inline" => self.delivery = DeliveryMode::Inline,
                "channel" => self.delivery = DeliveryMode::Channel,
                _ => {}
            }
        }
        if let Ok(v) = std::env::var("MECHBRIDGE_LOG_FORMAT") {
            match v.as_str() {
                "compact" => self.log_format = LogFormat::Compact,
                "json" => self.log_format = LogFormat::Json,
                _ => {}
            }
        }
    }
}
