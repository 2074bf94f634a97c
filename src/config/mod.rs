//! Configuration for the window engine
//!
//! Defaults for aggregate parameters and logging behaviour, loadable from
//! YAML/TOML files and environment variables:
//! - `SQLWINDOW_DDOF`
//! - `SQLWINDOW_MIN_PERIODS`
//! - `SQLWINDOW_INTERPOLATION`
//! - `SQLWINDOW_LOG_LEVEL`
//! - `SQLWINDOW_TRACE_QUERIES`

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{Error, Result};
use crate::window::aggregate::Interpolation;

pub mod loader;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WindowConfig {
    /// Defaults applied to window aggregates
    pub aggregation: AggregationDefaults,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Aggregate defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationDefaults {
    /// Delta degrees of freedom for var/std looked up by name
    pub ddof: usize,
    /// Minimum non-missing observations for a window to produce a value
    pub min_periods: usize,
    /// Interpolation for quantiles looked up by name
    pub interpolation: Interpolation,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level hint (trace, debug, info, warn, error)
    pub level: String,
    /// Emit a trace record for every query operation
    pub trace_queries: bool,
}

impl Default for AggregationDefaults {
    fn default() -> Self {
        Self {
            ddof: 1,
            min_periods: 1,
            interpolation: Interpolation::Linear,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            trace_queries: false,
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl LoggingConfig {
    /// The level as a `log` filter
    pub fn level_filter(&self) -> log::LevelFilter {
        match self.level.to_ascii_lowercase().as_str() {
            "trace" => log::LevelFilter::Trace,
            "debug" => log::LevelFilter::Debug,
            "warn" => log::LevelFilter::Warn,
            "error" => log::LevelFilter::Error,
            _ => log::LevelFilter::Info,
        }
    }
}

impl WindowConfig {
    /// Load configuration with precedence: defaults -> file -> environment
    pub fn load<P: AsRef<Path>>(config_file: Option<P>) -> Result<Self> {
        loader::load_with_precedence(config_file)
    }

    /// Check that all values are usable
    pub fn validate(&self) -> Result<()> {
        if self.aggregation.min_periods == 0 {
            return Err(Error::ConfigurationError(
                "aggregation.min_periods must be at least 1".to_string(),
            ));
        }
        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(Error::ConfigurationError(format!(
                "Invalid log level: {}. Must be one of: {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        loader::save_to_file(self, path.as_ref())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            Error::ConfigurationError(format!("Failed to serialize config to YAML: {}", e))
        })
    }

    /// Convert to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| {
            Error::ConfigurationError(format!("Failed to serialize config to TOML: {}", e))
        })
    }
}
