//! Configuration error definitions.

use thiserror::Error;

/// Result type for configuration validation.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Invalid configuration, rejected at construction rather than discovered
/// mid-retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The image source was empty or missing.
    #[error("image source must not be empty")]
    MissingSource,

    /// The retry delay cannot produce a usable timer.
    #[error("retry initial delay must be a positive number, got {value}")]
    InvalidRetryDelay {
        /// The rejected value.
        value: f64,
    },

    /// The throttle interval cannot rate-limit anything.
    #[error("throttle interval must be positive")]
    InvalidThrottleInterval,

    /// A config document could not be parsed.
    #[error("failed to parse loader config: {message}")]
    ParseFailed {
        /// Parser diagnostic.
        message: String,
    },
}

impl ConfigError {
    /// Creates a parse failure from any parser diagnostic.
    #[must_use]
    pub fn parse_failed(message: impl Into<String>) -> Self {
        Self::ParseFailed {
            message: message.into(),
        }
    }
}
