//! # Tollkit Pool
//!
//! A generic, thread-safe object pool that cuts allocation churn for
//! short-lived, high-frequency objects.
//!
//! - [`ObjectPool::get`] never fails: it reuses an idle object or creates a
//!   new one.
//! - [`ObjectPool::put`] transfers ownership back; passing `None` is a no-op.
//! - Reuse is best effort. Nothing guarantees which object `get` hands out.
//! - The pool never sanitizes objects. Callers own sanitization through the
//!   [`Reset`] capability, invoked by hand or via [`ObjectPool::put_reset`].
//! - [`PoolConfig::max_idle`] bounds the idle cache; surplus returns are
//!   dropped.
//!
//! ## Quick Start
//!
//! ```rust
//! use tollkit_pool::{ObjectPool, PoolConfig, Reset};
//!
//! let pool = ObjectPool::<String>::with_config(PoolConfig::bounded(64)).unwrap();
//!
//! let mut line = pool.get();
//! line.reset();
//! line.push_str("GET /health");
//! pool.put(line);
//!
//! // Scoped borrow: returned to the pool at end of scope.
//! {
//!     let mut scratch = pool.checkout();
//!     scratch.reset();
//!     scratch.push_str("scratch");
//! }
//! assert!(pool.idle() >= 1);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod error;
mod pool;
mod reset;
mod stats;

pub use config::PoolConfig;
pub use error::{PoolError, PoolResult};
pub use pool::{ObjectPool, Pooled};
pub use reset::Reset;
pub use stats::PoolStats;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::{ObjectPool, PoolConfig, Pooled, Reset};
}
