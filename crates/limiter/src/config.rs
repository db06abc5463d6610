//! Limiter configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LimiterError, LimiterResult};

/// Capacity used when a limiter is asked for zero tickets
pub const DEFAULT_CAPACITY: usize = 100;

/// Largest capacity a limiter can hold.
pub const MAX_CAPACITY: usize = tokio::sync::Semaphore::MAX_PERMITS;

/// Ticket limiter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimiterConfig {
    /// Number of tickets; `0` selects [`DEFAULT_CAPACITY`]
    pub capacity: usize,
    /// Deadline applied by the `*_bounded` operations
    #[cfg_attr(feature = "humantime", serde(with = "humantime_serde"))]
    pub acquire_timeout: Option<Duration>,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            acquire_timeout: None,
        }
    }
}

impl LimiterConfig {
    /// Create a configuration with the given capacity and no deadline
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Set the deadline used by the `*_bounded` operations
    #[must_use]
    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = Some(timeout);
        self
    }

    /// Capacity after defaulting
    #[must_use]
    pub fn effective_capacity(&self) -> usize {
        if self.capacity == 0 {
            DEFAULT_CAPACITY
        } else {
            self.capacity
        }
    }

    /// Validate configuration
    ///
    /// A zero capacity is not an error; it is replaced by [`DEFAULT_CAPACITY`].
    pub fn validate(&self) -> LimiterResult<()> {
        if self.capacity > MAX_CAPACITY {
            return Err(LimiterError::invalid_config(format!(
                "capacity {} exceeds the maximum of {MAX_CAPACITY}",
                self.capacity
            )));
        }
        if self.acquire_timeout.is_some_and(|t| t.is_zero()) {
            return Err(LimiterError::invalid_config(
                "acquire_timeout must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Merge with another configuration, keeping the more conservative values
    pub fn merge(&mut self, other: Self) {
        self.capacity = match (self.capacity, other.capacity) {
            (0, c) | (c, 0) => c,
            (a, b) => a.min(b),
        };
        self.acquire_timeout = match (self.acquire_timeout, other.acquire_timeout) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_defaults() {
        let config = LimiterConfig::new(0);
        assert!(config.validate().is_ok());
        assert_eq!(config.effective_capacity(), DEFAULT_CAPACITY);
        assert_eq!(LimiterConfig::new(7).effective_capacity(), 7);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = LimiterConfig::new(4).with_acquire_timeout(Duration::ZERO);
        assert!(matches!(
            config.validate(),
            Err(LimiterError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn oversized_capacity_is_rejected() {
        let config = LimiterConfig::new(MAX_CAPACITY + 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn merge_keeps_tighter_bounds() {
        let mut config = LimiterConfig::new(10).with_acquire_timeout(Duration::from_secs(5));
        config.merge(LimiterConfig::new(4).with_acquire_timeout(Duration::from_secs(1)));
        assert_eq!(config.capacity, 4);
        assert_eq!(config.acquire_timeout, Some(Duration::from_secs(1)));

        let mut config = LimiterConfig::new(0);
        config.merge(LimiterConfig::new(3));
        assert_eq!(config.capacity, 3);
        assert_eq!(config.acquire_timeout, None);
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: LimiterConfig = serde_json::from_str(r#"{"capacity": 8}"#).unwrap();
        assert_eq!(config, LimiterConfig::new(8));
    }

    #[cfg(feature = "humantime")]
    #[test]
    fn deserializes_humantime_timeout() {
        let config: LimiterConfig =
            serde_json::from_str(r#"{"capacity": 4, "acquire_timeout": "1m 30s"}"#).unwrap();
        assert_eq!(
            config,
            LimiterConfig::new(4).with_acquire_timeout(Duration::from_secs(90))
        );

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["acquire_timeout"], "1m 30s");
    }
}
