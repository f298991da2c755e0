//! Error types for attendify.
//!
//! Screening itself never fails; these errors come from loading
//! configuration, serializing output and delivering anomaly notifications.

use thiserror::Error;

/// The main error type for attendify operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// A custom suspicion pattern did not compile.
    #[error("invalid pattern for '{label}': {source}")]
    InvalidPattern {
        /// Label of the offending pattern.
        label: String,
        /// The underlying error.
        #[source]
        source: regex::Error,
    },

    // === Notification Errors ===
    /// An anomaly notification could not be delivered.
    #[error("failed to notify '{channel}': {message}")]
    Notification {
        /// Name of the notification channel.
        channel: &'static str,
        /// Description of what went wrong.
        message: String,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for attendify operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Create a notification error.
    #[must_use]
    pub fn notification(channel: &'static str, message: impl Into<String>) -> Self {
        Self::Notification {
            channel,
            message: message.into(),
        }
    }

    /// Check if this error came from configuration.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigLoad(_) | Self::ConfigValidation { .. } | Self::InvalidPattern { .. }
        )
    }
}
