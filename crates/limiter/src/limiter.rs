//! Ticket limiter: bounded admission with identifiable slots
//!
//! A [`TicketLimiter`] owns `capacity` ticket ids. A caller must hold a
//! [`Ticket`] to run a unit of work, so at most `capacity` units run at
//! once. Waiters are admitted in arrival order: the supply is a FIFO-fair
//! `tokio` semaphore paired with a free list of ids.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::{LimiterConfig, MAX_CAPACITY};
use crate::error::{LimiterError, LimiterResult};
use crate::ticket::{Ticket, TicketId};

/// Ticket ids not currently held.
///
/// Ids are issued lazily. Returned ids are reused first; a fresh id is
/// minted only when none is free, and never past `capacity`.
pub(crate) struct Slots {
    free: VecDeque<TicketId>,
    issued: usize,
    capacity: usize,
}

impl Slots {
    fn new(capacity: usize) -> Self {
        Self {
            free: VecDeque::new(),
            issued: 0,
            capacity,
        }
    }

    fn take(&mut self) -> Option<TicketId> {
        if let Some(id) = self.free.pop_front() {
            return Some(id);
        }
        if self.issued == self.capacity {
            return None;
        }
        self.issued += 1;
        Some(TicketId::new(self.issued))
    }

    pub(crate) fn give_back(&mut self, id: TicketId) {
        self.free.push_back(id);
    }
}

/// State shared between a limiter, its clones and its outstanding tickets
pub(crate) struct Shared {
    capacity: usize,
    acquire_timeout: Option<Duration>,
    semaphore: Arc<Semaphore>,
    pub(crate) slots: Mutex<Slots>,
    pub(crate) in_flight: AtomicUsize,
    admitted: AtomicU64,
    timed_out: AtomicU64,
    cancelled: AtomicU64,
    drained: AtomicBool,
}

/// Bounded-concurrency admission gate.
///
/// Cloning is cheap and every clone shares the same ticket supply.
///
/// # Example
/// ```
/// use tollkit_limiter::TicketLimiter;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let limiter = TicketLimiter::new(3);
///
/// let slot = limiter
///     .execute_with_ticket(|ticket| async move { ticket.get() })
///     .await;
/// assert!((1..=3).contains(&slot));
/// assert_eq!(limiter.in_progress(), 0);
/// # }
/// ```
#[derive(Clone)]
pub struct TicketLimiter {
    shared: Arc<Shared>,
}

impl TicketLimiter {
    /// Create a limiter with `capacity` tickets.
    ///
    /// A capacity of `0` is replaced by [`DEFAULT_CAPACITY`](crate::DEFAULT_CAPACITY).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::from_config(&LimiterConfig::new(capacity.min(MAX_CAPACITY)))
    }

    /// Create a limiter from a validated configuration
    pub fn with_config(config: LimiterConfig) -> LimiterResult<Self> {
        config.validate()?;
        Ok(Self::from_config(&config))
    }

    /// Start building a limiter
    #[must_use]
    pub fn builder() -> LimiterBuilder {
        LimiterBuilder::default()
    }

    fn from_config(config: &LimiterConfig) -> Self {
        let capacity = config.effective_capacity();
        if config.capacity == 0 {
            debug!(capacity, "zero capacity requested, using default");
        }

        Self {
            shared: Arc::new(Shared {
                capacity,
                acquire_timeout: config.acquire_timeout,
                semaphore: Arc::new(Semaphore::new(capacity)),
                slots: Mutex::new(Slots::new(capacity)),
                in_flight: AtomicUsize::new(0),
                admitted: AtomicU64::new(0),
                timed_out: AtomicU64::new(0),
                cancelled: AtomicU64::new(0),
                drained: AtomicBool::new(false),
            }),
        }
    }

    /// Total number of tickets
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    /// Number of tickets currently held.
    ///
    /// A point-in-time snapshot; it may be stale by the time it is read.
    #[must_use]
    pub fn in_progress(&self) -> usize {
        self.shared.in_flight.load(Ordering::Acquire)
    }

    /// Number of tickets that could be granted right now
    #[must_use]
    pub fn available(&self) -> usize {
        self.shared.semaphore.available_permits()
    }

    /// Whether [`wait`](Self::wait) has consumed the ticket supply
    #[must_use]
    pub fn is_drained(&self) -> bool {
        self.shared.drained.load(Ordering::Acquire)
    }

    /// Wait until a ticket is available and take it.
    ///
    /// Cancel-safe: dropping the returned future before it completes never
    /// consumes a ticket.
    pub async fn acquire(&self) -> Ticket {
        let permit = Arc::clone(&self.shared.semaphore)
            .acquire_owned()
            .await
            .expect("limiter semaphore is never closed");
        self.admit(permit)
    }

    /// Take a ticket if one is free, without waiting
    pub fn try_acquire(&self) -> Option<Ticket> {
        let permit = Arc::clone(&self.shared.semaphore)
            .try_acquire_owned()
            .ok()?;
        Some(self.admit(permit))
    }

    /// Wait at most `timeout` for a ticket
    #[tracing::instrument(skip(self), fields(capacity = self.shared.capacity))]
    pub async fn acquire_timeout(&self, timeout: Duration) -> LimiterResult<Ticket> {
        if let Ok(ticket) = tokio::time::timeout(timeout, self.acquire()).await {
            Ok(ticket)
        } else {
            self.shared.timed_out.fetch_add(1, Ordering::Relaxed);
            warn!(?timeout, in_flight = self.in_progress(), "ticket acquisition timed out");
            Err(LimiterError::timeout(timeout))
        }
    }

    /// Wait for a ticket until `token` is cancelled.
    ///
    /// An already-cancelled token is reported as [`LimiterError::Cancelled`]
    /// even when a ticket is free.
    #[tracing::instrument(skip_all, fields(capacity = self.shared.capacity))]
    pub async fn acquire_cancellable(&self, token: &CancellationToken) -> LimiterResult<Ticket> {
        tokio::select! {
            biased;
            () = token.cancelled() => {
                self.shared.cancelled.fetch_add(1, Ordering::Relaxed);
                info!("ticket acquisition cancelled");
                Err(LimiterError::Cancelled)
            }
            ticket = self.acquire() => Ok(ticket),
        }
    }

    /// Acquire using the configured `acquire_timeout`, or wait indefinitely
    /// when none is configured
    pub async fn acquire_bounded(&self) -> LimiterResult<Ticket> {
        match self.shared.acquire_timeout {
            Some(timeout) => self.acquire_timeout(timeout).await,
            None => Ok(self.acquire().await),
        }
    }

    /// Run `job` while holding a ticket.
    ///
    /// The ticket is released on every exit path. Whatever the job returns,
    /// including an `Err`, is handed back unchanged, and a panic inside the
    /// job keeps unwinding to the caller after the ticket is released.
    pub async fn execute<F, Fut, T>(&self, job: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let _ticket = self.acquire().await;
        job().await
    }

    /// Like [`execute`](Self::execute), passing the held slot to `job`
    pub async fn execute_with_ticket<F, Fut, T>(&self, job: F) -> T
    where
        F: FnOnce(TicketId) -> Fut,
        Fut: Future<Output = T>,
    {
        let ticket = self.acquire().await;
        job(ticket.id()).await
    }

    /// Run `job` if a ticket is obtained within `timeout`.
    ///
    /// The deadline bounds admission only; once admitted the job runs to
    /// completion.
    pub async fn execute_timeout<F, Fut, T>(&self, timeout: Duration, job: F) -> LimiterResult<T>
    where
        F: FnOnce(TicketId) -> Fut,
        Fut: Future<Output = T>,
    {
        let ticket = self.acquire_timeout(timeout).await?;
        Ok(job(ticket.id()).await)
    }

    /// Run `job` if a ticket is obtained before `token` is cancelled
    pub async fn execute_cancellable<F, Fut, T>(
        &self,
        token: &CancellationToken,
        job: F,
    ) -> LimiterResult<T>
    where
        F: FnOnce(TicketId) -> Fut,
        Fut: Future<Output = T>,
    {
        let ticket = self.acquire_cancellable(token).await?;
        Ok(job(ticket.id()).await)
    }

    /// Run `job` under the configured `acquire_timeout`
    pub async fn execute_bounded<F, Fut, T>(&self, job: F) -> LimiterResult<T>
    where
        F: FnOnce(TicketId) -> Fut,
        Fut: Future<Output = T>,
    {
        let ticket = self.acquire_bounded().await?;
        Ok(job(ticket.id()).await)
    }

    /// Drain the whole ticket supply.
    ///
    /// Takes every ticket one at a time, queueing behind earlier waiters and
    /// behind tickets still held, and never gives them back. When this
    /// returns all earlier work has finished and the limiter is closed for
    /// good: later acquisitions wait forever (or until their deadline or
    /// token fires). Drained tickets do not count as in progress.
    ///
    /// This is a one-shot barrier, not a reusable "wait for idle". A second
    /// call never completes, and dropping the future part way leaves the
    /// tickets taken so far drained.
    #[tracing::instrument(skip(self), fields(capacity = self.shared.capacity))]
    pub async fn wait(&self) {
        for _ in 0..self.shared.capacity {
            Arc::clone(&self.shared.semaphore)
                .acquire_owned()
                .await
                .expect("limiter semaphore is never closed")
                .forget();
            let ticket = self.shared.slots.lock().take();
            debug!(?ticket, "ticket drained");
        }
        self.shared.drained.store(true, Ordering::Release);
        info!("ticket supply drained, admission closed");
    }

    /// Snapshot of counters
    #[must_use]
    pub fn stats(&self) -> LimiterStats {
        LimiterStats {
            capacity: self.shared.capacity,
            in_progress: self.in_progress(),
            available: self.available(),
            admitted: self.shared.admitted.load(Ordering::Relaxed),
            timed_out: self.shared.timed_out.load(Ordering::Relaxed),
            cancelled: self.shared.cancelled.load(Ordering::Relaxed),
            drained: self.is_drained(),
        }
    }

    fn admit(&self, permit: OwnedSemaphorePermit) -> Ticket {
        let id = self
            .shared
            .slots
            .lock()
            .take()
            .expect("every granted permit has a free ticket id");
        let in_flight = self.shared.in_flight.fetch_add(1, Ordering::AcqRel) + 1;
        self.shared.admitted.fetch_add(1, Ordering::Relaxed);
        debug!(ticket = %id, in_flight, "ticket acquired");
        Ticket::new(id, Arc::clone(&self.shared), permit)
    }
}

impl Default for TicketLimiter {
    fn default() -> Self {
        Self::from_config(&LimiterConfig::default())
    }
}

impl fmt::Debug for TicketLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TicketLimiter")
            .field("capacity", &self.capacity())
            .field("in_progress", &self.in_progress())
            .field("available", &self.available())
            .field("drained", &self.is_drained())
            .finish()
    }
}

/// Limiter statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LimiterStats {
    /// Total number of tickets
    pub capacity: usize,
    /// Tickets currently held
    pub in_progress: usize,
    /// Tickets that could be granted right now
    pub available: usize,
    /// Tickets granted since creation
    pub admitted: u64,
    /// Acquisitions that gave up at their deadline
    pub timed_out: u64,
    /// Acquisitions abandoned through a cancellation token
    pub cancelled: u64,
    /// Whether the supply has been drained by `wait`
    pub drained: bool,
}

/// Builder for ticket limiters
#[derive(Debug, Clone, Default)]
pub struct LimiterBuilder {
    config: LimiterConfig,
}

impl LimiterBuilder {
    /// Set the number of tickets
    #[must_use]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    /// Set the deadline used by the `*_bounded` operations
    #[must_use]
    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.config.acquire_timeout = Some(timeout);
        self
    }

    /// Build the limiter
    pub fn build(self) -> LimiterResult<TicketLimiter> {
        TicketLimiter::with_config(self.config)
    }
}
