//! Error types for ticket limiter operations
//!
//! Plain admission never fails: `TicketLimiter::acquire` either yields a
//! ticket or keeps waiting. Errors only appear once a deadline or a
//! cancellation token is attached, or when a configuration is rejected.

use std::time::Duration;

use thiserror::Error;

/// Errors produced by the ticket limiter
#[must_use = "errors should be handled"]
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LimiterError {
    /// No ticket became available before the deadline
    #[error("no ticket available after waiting {waited:?}")]
    Timeout {
        /// How long the caller waited for admission
        waited: Duration,
    },

    /// The caller's cancellation token fired while waiting for a ticket
    #[error("ticket acquisition was cancelled")]
    Cancelled,

    /// The supplied configuration cannot be used
    #[error("invalid limiter configuration: {reason}")]
    InvalidConfig {
        /// What is wrong with the configuration
        reason: String,
    },
}

impl LimiterError {
    /// Create a timeout error
    pub fn timeout(waited: Duration) -> Self {
        Self::Timeout { waited }
    }

    /// Create an invalid config error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Check if the caller may reasonably try again
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Get error code for categorization
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "LIMITER:ACQUIRE:TIMEOUT",
            Self::Cancelled => "LIMITER:ACQUIRE:CANCELLED",
            Self::InvalidConfig { .. } => "LIMITER:CONFIG:INVALID",
        }
    }
}

/// Result type for limiter operations
pub type LimiterResult<T> = Result<T, LimiterError>;
