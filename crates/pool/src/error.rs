//! Error types for object pools
//!
//! Borrowing and returning objects never fails; only configuration can be
//! rejected.

use thiserror::Error;

/// Object pool errors
#[must_use = "errors should be handled"]
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// The supplied configuration cannot be used
    #[error("invalid pool configuration: {reason}")]
    InvalidConfig {
        /// What is wrong with the configuration
        reason: String,
    },
}

impl PoolError {
    /// Create an invalid config error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Get error code for categorization
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "POOL:CONFIG:INVALID",
        }
    }
}

/// Result type for pool operations
pub type PoolResult<T> = Result<T, PoolError>;
