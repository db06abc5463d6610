//! Thread-safe object pool
//!
//! Idle objects live in a lock-free `SegQueue`. When `max_idle` is set an
//! atomic idle count caps the queue without allocating the bound up front.
//! `get` and `put` never block on other borrowers.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_queue::SegQueue;
use tracing::{debug, trace};

use crate::config::PoolConfig;
use crate::error::PoolResult;
use crate::reset::Reset;
use crate::stats::{PoolCounters, PoolStats};

/// Idle objects plus a count that never exceeds `max_idle`.
///
/// A push reserves its slot in `len` before touching the queue, and a pop
/// releases it only after taking an object, so `len` is an upper bound on
/// the queue length and never underflows.
struct IdleQueue<T> {
    queue: SegQueue<Box<T>>,
    len: AtomicUsize,
    max_idle: Option<usize>,
}

impl<T> IdleQueue<T> {
    fn for_config(config: &PoolConfig) -> Self {
        Self {
            queue: SegQueue::new(),
            len: AtomicUsize::new(0),
            max_idle: config.max_idle,
        }
    }

    fn pop(&self) -> Option<Box<T>> {
        let obj = self.queue.pop()?;
        self.len.fetch_sub(1, Ordering::AcqRel);
        Some(obj)
    }

    /// Hands the object back when the queue is full
    fn push(&self, obj: Box<T>) -> Result<(), Box<T>> {
        let reserved = match self.max_idle {
            Some(max) => self
                .len
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                    (n < max).then_some(n + 1)
                })
                .is_ok(),
            None => {
                self.len.fetch_add(1, Ordering::AcqRel);
                true
            }
        };
        if !reserved {
            return Err(obj);
        }
        self.queue.push(obj);
        Ok(())
    }

    fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }
}

/// Thread-safe cache of reusable `T` instances.
///
/// The pool does not sanitize objects: an object obtained from
/// [`get`](Self::get) may carry whatever state its previous borrower left
/// in it. Callers own sanitization, either by calling [`Reset::reset`]
/// themselves or by returning objects through [`put_reset`](Self::put_reset).
///
/// Share a pool between threads or tasks by wrapping it in an `Arc`.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use std::thread;
///
/// use tollkit_pool::ObjectPool;
///
/// let pool = Arc::new(ObjectPool::<Vec<u8>>::new());
///
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let pool = Arc::clone(&pool);
///         thread::spawn(move || {
///             let mut buffer = pool.get();
///             buffer.clear();
///             buffer.extend_from_slice(b"hello");
///             pool.put(buffer);
///         })
///     })
///     .collect();
///
/// for h in handles {
///     h.join().unwrap();
/// }
/// assert!(pool.idle() >= 1);
/// ```
pub struct ObjectPool<T> {
    idle: IdleQueue<T>,
    factory: Box<dyn Fn() -> T + Send + Sync>,
    config: PoolConfig,
    counters: PoolCounters,
}

impl<T: Default + 'static> ObjectPool<T> {
    /// Create an unbounded pool producing `T::default()` when empty
    #[must_use]
    pub fn new() -> Self {
        Self::build(PoolConfig::default(), Box::new(T::default))
    }

    /// Create a pool producing `T::default()` with a validated configuration
    pub fn with_config(config: PoolConfig) -> PoolResult<Self> {
        config.validate()?;
        Ok(Self::build(config, Box::new(T::default)))
    }
}

impl<T> ObjectPool<T> {
    /// Create a pool that builds new objects with `factory`
    pub fn with_factory<F>(config: PoolConfig, factory: F) -> PoolResult<Self>
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        config.validate()?;
        Ok(Self::build(config, Box::new(factory)))
    }

    fn build(config: PoolConfig, factory: Box<dyn Fn() -> T + Send + Sync>) -> Self {
        let pool = Self {
            idle: IdleQueue::for_config(&config),
            factory,
            config,
            counters: PoolCounters::default(),
        };

        for _ in 0..pool.config.prewarm {
            let obj = pool.create();
            if pool.idle.push(obj).is_err() {
                pool.counters.record_discard(1);
            }
        }

        debug!(
            max_idle = ?pool.config.max_idle,
            prewarmed = pool.config.prewarm,
            "object pool created"
        );
        pool
    }

    /// Borrow an object.
    ///
    /// Returns a cached object as-is when one is idle, otherwise creates a
    /// new one. Never fails and never waits for other borrowers.
    pub fn get(&self) -> Box<T> {
        if let Some(obj) = self.idle.pop() {
            self.counters.record_hit();
            trace!(idle = self.idle.len(), "pool hit");
            obj
        } else {
            self.counters.record_miss();
            trace!("pool miss, creating object");
            self.create()
        }
    }

    /// Give an object back for reuse.
    ///
    /// Accepts a `Box<T>` or an `Option<Box<T>>`; `None` is a no-op. The
    /// object is dropped instead of cached once `max_idle` objects are idle.
    pub fn put(&self, obj: impl Into<Option<Box<T>>>) {
        let Some(obj) = obj.into() else {
            return;
        };

        self.counters.record_return();
        if self.idle.push(obj).is_err() {
            self.counters.record_discard(1);
            trace!(max_idle = ?self.config.max_idle, "pool full, dropping returned object");
        }
    }

    /// Borrow an object that returns itself to the pool when dropped
    pub fn checkout(&self) -> Pooled<'_, T> {
        Pooled {
            value: Some(self.get()),
            pool: self,
        }
    }

    /// Number of idle objects currently cached
    #[must_use]
    pub fn idle(&self) -> usize {
        self.idle.len()
    }

    /// Drop every idle object, returning how many were dropped
    pub fn clear(&self) -> usize {
        let mut dropped = 0;
        while self.idle.pop().is_some() {
            dropped += 1;
        }
        self.counters.record_discard(dropped as u64);
        debug!(dropped, "object pool cleared");
        dropped
    }

    /// Drop idle objects until at most `size` remain.
    ///
    /// Concurrent `put` calls may leave the pool slightly above `size`.
    pub fn shrink_to(&self, size: usize) {
        let mut dropped = 0_u64;
        while self.idle.len() > size {
            if self.idle.pop().is_none() {
                break;
            }
            dropped += 1;
        }
        self.counters.record_discard(dropped);
    }

    /// Pool configuration
    #[must_use]
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Get pool statistics
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.counters.snapshot(self.idle.len())
    }

    fn create(&self) -> Box<T> {
        self.counters.record_creation();
        Box::new((self.factory)())
    }
}

impl<T: Reset> ObjectPool<T> {
    /// Reset `obj` and give it back for reuse.
    ///
    /// The reset happens because the caller asked for it here; plain
    /// [`put`](Self::put) never resets.
    pub fn put_reset(&self, obj: impl Into<Option<Box<T>>>) {
        let Some(mut obj) = obj.into() else {
            return;
        };
        obj.reset();
        self.put(obj);
    }
}

impl<T: Default + 'static> Default for ObjectPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ObjectPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectPool")
            .field("idle", &self.idle())
            .field("config", &self.config)
            .finish()
    }
}

/// RAII handle for a borrowed object.
///
/// Dropping it returns the object to its pool. Use [`detach`](Self::detach)
/// to keep the object instead.
pub struct Pooled<'a, T> {
    value: Option<Box<T>>,
    pool: &'a ObjectPool<T>,
}

impl<T> Pooled<'_, T> {
    /// Take the object out; it will not be returned to the pool
    #[must_use]
    pub fn detach(mut self) -> Box<T> {
        self.value.take().expect("pooled value used after detach")
    }
}

impl<T> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.value.as_deref().expect("pooled value used after detach")
    }
}

impl<T> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.value
            .as_deref_mut()
            .expect("pooled value used after detach")
    }
}

impl<T> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        if let Some(value) = self.value.take() {
            self.pool.put(value);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Pooled<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pooled").field("value", &self.value).finish()
    }
}
