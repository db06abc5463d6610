//! Object pool configuration

use serde::{Deserialize, Serialize};

use crate::error::{PoolError, PoolResult};

/// Object pool configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Upper bound on idle objects kept for reuse; `None` is unbounded.
    ///
    /// Objects returned while the pool already holds this many are dropped.
    /// The bound limits the cache, not how many objects may be borrowed.
    pub max_idle: Option<usize>,
    /// Objects created up front at construction
    pub prewarm: usize,
}

impl PoolConfig {
    /// Unbounded pool without prewarming
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pool keeping at most `max_idle` idle objects
    #[must_use]
    pub fn bounded(max_idle: usize) -> Self {
        Self {
            max_idle: Some(max_idle),
            ..Self::default()
        }
    }

    /// Create `count` objects at construction
    #[must_use]
    pub fn with_prewarm(mut self, count: usize) -> Self {
        self.prewarm = count;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> PoolResult<()> {
        match self.max_idle {
            Some(0) => Err(PoolError::invalid_config(
                "max_idle must be greater than 0 (use None for an unbounded pool)",
            )),
            Some(max) if self.prewarm > max => Err(PoolError::invalid_config(format!(
                "prewarm ({}) cannot exceed max_idle ({max})",
                self.prewarm
            ))),
            _ => Ok(()),
        }
    }

    /// Merge with another configuration, keeping the tighter bound
    pub fn merge(&mut self, other: Self) {
        self.max_idle = match (self.max_idle, other.max_idle) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.prewarm = self.prewarm.max(other.prewarm);
        if let Some(max) = self.max_idle {
            self.prewarm = self.prewarm.min(max);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unbounded() {
        let config = PoolConfig::default();
        assert_eq!(config.max_idle, None);
        assert_eq!(config.prewarm, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_bound_is_rejected() {
        let err = PoolConfig::bounded(0).validate().unwrap_err();
        assert_eq!(err.code(), "POOL:CONFIG:INVALID");
    }

    #[test]
    fn prewarm_beyond_bound_is_rejected() {
        assert!(PoolConfig::bounded(2).with_prewarm(3).validate().is_err());
        assert!(PoolConfig::bounded(3).with_prewarm(3).validate().is_ok());
        assert!(PoolConfig::new().with_prewarm(1000).validate().is_ok());
    }

    #[test]
    fn merge_keeps_tighter_bound() {
        let mut config = PoolConfig::new().with_prewarm(8);
        config.merge(PoolConfig::bounded(4));
        assert_eq!(config.max_idle, Some(4));
        assert_eq!(config.prewarm, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: PoolConfig = serde_json::from_str(r#"{"max_idle": 16}"#).unwrap();
        assert_eq!(config, PoolConfig::bounded(16));
    }
}
