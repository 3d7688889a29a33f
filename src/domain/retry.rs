//! Retry policy configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::errors::ConfigError;

const DEFAULT_MAX_ATTEMPTS: u32 = 8;
const DEFAULT_INITIAL_DELAY_SECS: f64 = 2.0;

/// How the retry delay evolves after each failed attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accumulation {
    /// Multiply the running delay by the initial delay.
    #[default]
    Multiply,
    /// Add the initial delay to the running delay.
    Add,
    /// Keep the delay pinned to the initial delay.
    Fixed,
}

impl std::fmt::Display for Accumulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Multiply => write!(f, "multiply"),
            Self::Add => write!(f, "add"),
            Self::Fixed => write!(f, "fixed"),
        }
    }
}

/// Immutable retry configuration, supplied at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Number of retries permitted after the first failure.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry, in seconds. Must be positive.
    #[serde(default = "default_initial_delay_secs")]
    pub initial_delay_secs: f64,

    /// Delay growth rule.
    #[serde(default)]
    pub accumulation: Accumulation,
}

const fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

const fn default_initial_delay_secs() -> f64 {
    DEFAULT_INITIAL_DELAY_SECS
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay_secs: DEFAULT_INITIAL_DELAY_SECS,
            accumulation: Accumulation::default(),
        }
    }
}

impl RetryPolicy {
    /// Creates the default policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the retry budget.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the initial delay in seconds.
    #[must_use]
    pub const fn with_initial_delay_secs(mut self, secs: f64) -> Self {
        self.initial_delay_secs = secs;
        self
    }

    /// Sets the delay growth rule.
    #[must_use]
    pub const fn with_accumulation(mut self, accumulation: Accumulation) -> Self {
        self.accumulation = accumulation;
        self
    }

    /// Validates the policy.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidRetryDelay` if the initial delay is not
    /// a positive, finite number.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.initial_delay_secs.is_finite() || self.initial_delay_secs <= 0.0 {
            return Err(ConfigError::InvalidRetryDelay {
                value: self.initial_delay_secs,
            });
        }
        Ok(())
    }

    /// Initial delay as a duration.
    ///
    /// Saturates for delays that no longer fit a `Duration`.
    #[must_use]
    pub fn initial_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.initial_delay_secs).unwrap_or(Duration::MAX)
    }
}
