//! Configuration loading and validation.
//!
//! The console reads a single TOML file once at startup. Every field has
//! a default so a missing file (or a partial one) still yields a usable
//! configuration; `load_or_default()` encodes that policy. Thresholds and
//! the monitor interval are immutable for the process lifetime.
//!
//! # TOML Example
//!
//! ```toml
//! [shared]
//! log_level = "debug"
//! service_name = "pictl-living-room"
//!
//! [monitor]
//! cpu_percent = 90.0
//! temperature_celsius = 80.0
//! disk_percent = 90.0
//! interval_secs = 30
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, detailed tracing information.
    Trace,
    /// Debug information useful during development.
    Debug,
    /// General information about application operation.
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages for serious problems.
    Error,
}

impl LogLevel {
    /// Equivalent `tracing` level, for subscriber setup.
    pub fn as_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

/// Common fields shared across pictl services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Instance identifier, used in notifications and logs.
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            service_name: default_service_name(),
        }
    }
}

fn default_service_name() -> String {
    "pictl".to_string()
}

/// Alert ceilings for the monitor scheduler.
///
/// A metric strictly above its ceiling is a breach. Values are immutable
/// after load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// CPU utilization ceiling in percent.
    #[serde(default = "default_cpu_percent")]
    pub cpu_percent: f64,
    /// Temperature ceiling in degrees Celsius.
    #[serde(default = "default_temperature_celsius")]
    pub temperature_celsius: f64,
    /// Disk utilization ceiling in percent.
    #[serde(default = "default_disk_percent")]
    pub disk_percent: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            cpu_percent: default_cpu_percent(),
            temperature_celsius: default_temperature_celsius(),
            disk_percent: default_disk_percent(),
        }
    }
}

fn default_cpu_percent() -> f64 {
    90.0
}

fn default_temperature_celsius() -> f64 {
    80.0
}

fn default_disk_percent() -> f64 {
    90.0
}

/// Monitor scheduler configuration: thresholds plus tick interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Alert thresholds, one ceiling per metric.
    #[serde(flatten)]
    pub thresholds: Thresholds,

    /// Seconds between scheduler ticks.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            interval_secs: default_interval_secs(),
        }
    }
}

fn default_interval_secs() -> u64 {
    30
}

/// One output device to register at startup.
///
/// Kind is expressed as a `pwm` flag so the file stays close to the
/// operator's mental model: everything is on/off unless marked analog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceEntry {
    /// Physical pin address.
    pub pin: u8,
    /// Logical device name, unique per registry.
    pub name: String,
    /// True for an analog (PWM) output.
    #[serde(default)]
    pub pwm: bool,
}

/// Top-level console configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Shared service fields.
    #[serde(default)]
    pub shared: SharedConfig,

    /// Monitor scheduler settings.
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Output devices registered at startup.
    #[serde(default)]
    pub devices: Vec<DeviceEntry>,
}

impl ConsoleConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// - `ConfigError::FileNotFound` if the file does not exist
    /// - `ConfigError::ParseError` if TOML syntax is invalid
    /// - `ConfigError::ValidationError` if semantic validation fails
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound);
        }

        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        let config: Self =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults if the file is missing.
    ///
    /// A missing file is expected on a fresh install and logged at WARN;
    /// parse and validation failures are still surfaced as errors so a
    /// present-but-broken file does not silently revert to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(ConfigError::FileNotFound) => {
                tracing::warn!("No config file at {:?}, using defaults", path);
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    /// Returns `ConfigError::ValidationError` if:
    /// - `service_name` is empty
    /// - any threshold is not strictly positive
    /// - `interval_secs` is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shared.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }

        let t = &self.monitor.thresholds;
        for (name, value) in [
            ("cpu_percent", t.cpu_percent),
            ("temperature_celsius", t.temperature_celsius),
            ("disk_percent", t.disk_percent),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }

        if self.monitor.interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "interval_secs must be at least 1".to_string(),
            ));
        }

        for device in &self.devices {
            if device.name.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "device on pin {} has an empty name",
                    device.pin
                )));
            }
        }

        Ok(())
    }
}
