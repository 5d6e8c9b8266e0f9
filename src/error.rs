//! Error types for the pac-router crate.
//!
//! All fallible paths are construction-time: configuration and cache
//! capacity validation. Routing decisions themselves never fail; absence
//! is modeled with `Option`, not errors.

use thiserror::Error;

/// Main error type for the pac-router crate.
#[derive(Error, Debug)]
pub enum RouterError {
    /// Cache capacity must allow at least one entry.
    #[error("Invalid cache capacity: {capacity} (must be at least 1)")]
    InvalidCapacity { capacity: usize },

    /// Configuration validation failed.
    #[error("Invalid configuration: {message}")]
    ConfigValidation { message: String },
}

impl RouterError {
    /// Creates a new configuration validation error.
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }
}

/// Result type alias using RouterError.
pub type Result<T> = std::result::Result<T, RouterError>;
