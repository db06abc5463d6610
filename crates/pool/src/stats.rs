//! Statistics tracking for object pools

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Live counters updated by pool operations
#[derive(Debug, Default)]
pub(crate) struct PoolCounters {
    gets: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    created: AtomicU64,
    returned: AtomicU64,
    discarded: AtomicU64,
}

impl PoolCounters {
    pub(crate) fn record_hit(&self) {
        self.gets.fetch_add(1, Ordering::Relaxed);
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.gets.fetch_add(1, Ordering::Relaxed);
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_creation(&self) {
        self.created.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_return(&self) {
        self.returned.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_discard(&self, count: u64) {
        self.discarded.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, idle: usize) -> PoolStats {
        PoolStats {
            gets: self.gets.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            created: self.created.load(Ordering::Relaxed),
            returned: self.returned.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            idle,
        }
    }
}

/// Point-in-time pool statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Objects handed out
    pub gets: u64,
    /// Gets served from the idle cache
    pub hits: u64,
    /// Gets that had to create a new object
    pub misses: u64,
    /// Objects created, including prewarmed ones
    pub created: u64,
    /// Objects given back to the pool
    pub returned: u64,
    /// Objects dropped instead of cached (bound reached, clear, shrink)
    pub discarded: u64,
    /// Objects idle in the cache when the snapshot was taken
    pub idle: usize,
}

impl PoolStats {
    /// Fraction of gets served from the cache (0.0 - 1.0)
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        if self.gets == 0 {
            0.0
        } else {
            self.hits as f64 / self.gets as f64
        }
    }
}
