//! Configuration loading utilities
//!
//! This module handles loading configuration from files and environment
//! variables with proper precedence and validation.

use super::*;
use crate::core::error::{Error, Result};
use crate::window::spec::WindowSpec;
use std::env;
use std::fs;
use std::path::Path;

/// Load configuration from environment variables on top of the defaults
pub fn load_from_env() -> Result<WindowConfig> {
    let mut config = WindowConfig::default();
    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Override `config` with whatever `SQLWINDOW_*` variables are set
pub fn apply_env_overrides(config: &mut WindowConfig) -> Result<()> {
    if let Ok(ddof) = env::var("SQLWINDOW_DDOF") {
        config.aggregation.ddof = ddof
            .parse()
            .map_err(|e| Error::ConfigurationError(format!("Invalid SQLWINDOW_DDOF: {}", e)))?;
    }

    if let Ok(min_periods) = env::var("SQLWINDOW_MIN_PERIODS") {
        config.aggregation.min_periods = min_periods.parse().map_err(|e| {
            Error::ConfigurationError(format!("Invalid SQLWINDOW_MIN_PERIODS: {}", e))
        })?;
    }

    if let Ok(interpolation) = env::var("SQLWINDOW_INTERPOLATION") {
        config.aggregation.interpolation = interpolation.parse().map_err(|e| {
            Error::ConfigurationError(format!("Invalid SQLWINDOW_INTERPOLATION: {}", e))
        })?;
    }

    if let Ok(level) = env::var("SQLWINDOW_LOG_LEVEL") {
        config.logging.level = level;
    }

    if let Ok(trace) = env::var("SQLWINDOW_TRACE_QUERIES") {
        config.logging.trace_queries = matches!(
            trace.to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        );
    }

    Ok(())
}

fn read_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::ConfigurationError(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    fs::read_to_string(path).map_err(|e| {
        Error::ConfigurationError(format!(
            "Failed to read config file {}: {}",
            path.display(),
            e
        ))
    })
}

/// Load configuration from a YAML or TOML file, chosen by extension
pub fn load_from_file(path: &Path) -> Result<WindowConfig> {
    let contents = read_file(path)?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => load_from_yaml(&contents),
        Some("toml") => load_from_toml(&contents),
        Some(ext) => Err(Error::ConfigurationError(format!(
            "Unsupported config file format: {}",
            ext
        ))),
        None => {
            // Try to parse as YAML first, then TOML
            load_from_yaml(&contents).or_else(|_| load_from_toml(&contents))
        }
    }
}

/// Load configuration from YAML string
pub fn load_from_yaml(yaml: &str) -> Result<WindowConfig> {
    serde_yaml::from_str(yaml)
        .map_err(|e| Error::ConfigurationError(format!("Failed to parse YAML config: {}", e)))
}

/// Load configuration from TOML string
pub fn load_from_toml(toml: &str) -> Result<WindowConfig> {
    toml::from_str(toml)
        .map_err(|e| Error::ConfigurationError(format!("Failed to parse TOML config: {}", e)))
}

/// Load configuration with precedence: defaults -> file -> environment
pub fn load_with_precedence<P: AsRef<Path>>(config_file: Option<P>) -> Result<WindowConfig> {
    let mut config = match config_file {
        Some(file_path) => load_from_file(file_path.as_ref())?,
        None => WindowConfig::default(),
    };

    apply_env_overrides(&mut config)?;
    config.validate()?;

    log::debug!(
        "loaded window config: ddof={}, min_periods={}, interpolation={}",
        config.aggregation.ddof,
        config.aggregation.min_periods,
        config.aggregation.interpolation
    );
    Ok(config)
}

/// Save configuration to a file
pub fn save_to_file(config: &WindowConfig, path: &Path) -> Result<()> {
    let contents = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => config.to_yaml()?,
        Some("toml") => config.to_toml()?,
        _ => config.to_yaml()?,
    };

    fs::write(path, contents).map_err(|e| {
        Error::ConfigurationError(format!(
            "Failed to write config file {}: {}",
            path.display(),
            e
        ))
    })
}

/// Load a window specification from YAML
pub fn load_spec_from_yaml(yaml: &str) -> Result<WindowSpec> {
    serde_yaml::from_str(yaml)
        .map_err(|e| Error::ConfigurationError(format!("Failed to parse YAML window spec: {}", e)))
}

/// Load a window specification from TOML
pub fn load_spec_from_toml(toml: &str) -> Result<WindowSpec> {
    toml::from_str(toml)
        .map_err(|e| Error::ConfigurationError(format!("Failed to parse TOML window spec: {}", e)))
}
