//! # Tollkit Limiter
//!
//! Bounded-concurrency admission control. A [`TicketLimiter`] hands out at
//! most `capacity` [`Ticket`]s; holding a ticket is what allows a unit of
//! work to run, so the limiter caps how many run at once.
//!
//! - Waiters are admitted first come, first served.
//! - Every ticket carries a [`TicketId`] in `1..=capacity`, so work can be
//!   correlated with the slot it occupies.
//! - Release is tied to dropping the ticket and happens on every exit path,
//!   panics included. Failures inside a job are never swallowed.
//! - Acquisition can be bounded by a deadline or a cancellation token; a
//!   timed-out or cancelled call never holds a ticket.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use tollkit_limiter::{LimiterError, TicketLimiter};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let limiter = TicketLimiter::new(2);
//!
//! // Scoped: the ticket is returned when the job finishes.
//! let answer = limiter.execute(|| async { 40 + 2 }).await;
//! assert_eq!(answer, 42);
//!
//! // Manual: hold tickets, then fail fast on a deadline.
//! let _a = limiter.acquire().await;
//! let _b = limiter.acquire().await;
//! let err = limiter
//!     .acquire_timeout(Duration::from_millis(10))
//!     .await
//!     .unwrap_err();
//! assert!(matches!(err, LimiterError::Timeout { .. }));
//! # }
//! ```
//!
//! ## Blocking Callers
//!
//! Acquisition is async. Plain threads use [`TicketLimiter::try_acquire`]
//! to poll, or drive the async operations through a runtime handle:
//!
//! ```rust
//! use std::thread;
//! use tollkit_limiter::TicketLimiter;
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let limiter = TicketLimiter::new(2);
//!
//! let workers: Vec<_> = (0..4)
//!     .map(|i| {
//!         let handle = runtime.handle().clone();
//!         let limiter = limiter.clone();
//!         thread::spawn(move || handle.block_on(limiter.execute(|| async move { i * 2 })))
//!     })
//!     .collect();
//!
//! let total: i32 = workers.into_iter().map(|w| w.join().unwrap()).sum();
//! assert_eq!(total, 12);
//! assert_eq!(limiter.in_progress(), 0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod error;
mod limiter;
mod ticket;

pub use config::{DEFAULT_CAPACITY, LimiterConfig, MAX_CAPACITY};
pub use error::{LimiterError, LimiterResult};
pub use limiter::{LimiterBuilder, LimiterStats, TicketLimiter};
pub use ticket::{Ticket, TicketId};

/// Cancellation token accepted by the `*_cancellable` operations
pub use tokio_util::sync::CancellationToken;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::{LimiterError, LimiterResult, Ticket, TicketId, TicketLimiter};
}
