//! Configuration management for attendify.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::screening::{compile_pattern, ScreeningConfig, SuspicionCategory};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "attendify";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "ATTENDIFY_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `ATTENDIFY_`, nested with `__`)
/// 2. TOML config file at `~/.config/attendify/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Comment screening configuration.
    pub screening: ScreeningConfig,
    /// Attendance marking configuration.
    pub attendance: AttendanceConfig,
}

/// Attendance-related configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttendanceConfig {
    /// Notify administrators about flagged submissions.
    pub notify_admin: bool,
    /// Keep the comment text on the attendance record.
    pub keep_comment: bool,
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            notify_admin: true,
            keep_comment: true,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A missing config file is not an error; defaults are used instead.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        tracing::debug!(path = %config_file.display(), "Configuration loaded");
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a custom pattern has an empty label, a duplicate
    /// label (including a built-in label while built-ins are enabled), or a
    /// regex that does not compile.
    pub fn validate(&self) -> Result<()> {
        let mut seen: Vec<&str> = Vec::new();

        for custom in &self.screening.custom_patterns {
            let label = custom.label.trim();
            if label.is_empty() {
                return Err(Error::config_validation(format!(
                    "custom pattern '{}' has an empty label",
                    custom.pattern
                )));
            }

            if seen.contains(&label) {
                return Err(Error::config_validation(format!(
                    "duplicate custom pattern label: {label}"
                )));
            }
            seen.push(label);

            if self.screening.use_builtin_patterns && SuspicionCategory::from_label(label).is_some()
            {
                return Err(Error::config_validation(format!(
                    "custom pattern label collides with built-in category: {label}"
                )));
            }

            compile_pattern(&custom.pattern).map_err(|source| Error::InvalidPattern {
                label: custom.label.clone(),
                source,
            })?;
        }

        Ok(())
    }
}
