//! # Anew
//!
//! > *Try the operation anew.*
//!
//! A retry combinator for asynchronous operations: wrap an async operation
//! once, and every invocation of the wrapped operation re-invokes the
//! original on failure according to configurable attempt, delay, and
//! argument-rewriting policies.
//!
//! ## Design
//!
//! - **Configuration is data**: a [`RetryConfig`] is captured at wrap time
//!   and describes behavior; the loop in [`Retrying::call`] executes it.
//! - **Hooks may be sync or async**: the attempt predicate, delay function,
//!   and argument rewriter all return an [`Eval`] - an immediate value or a
//!   deferred future - and the loop normalizes both uniformly.
//! - **Waiting is pluggable**: the loop talks to a [`Sleep`] implementation,
//!   tokio-backed by default, swappable for tests or other runtimes.
//!
//! ## Quick Example
//!
//! ```rust
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use std::sync::Arc;
//! use anew::{wrap, RetryConfig};
//!
//! # tokio_test::block_on(async {
//! let calls = Arc::new(AtomicU32::new(0));
//!
//! let flaky = {
//!     let calls = calls.clone();
//!     move |name: String| {
//!         let calls = calls.clone();
//!         async move {
//!             if calls.fetch_add(1, Ordering::SeqCst) < 2 {
//!                 Err(format!("{} unavailable", name))
//!             } else {
//!                 Ok(format!("{} ready", name))
//!             }
//!         }
//!     }
//! };
//!
//! let wrapped = wrap(flaky, RetryConfig::attempts(5));
//!
//! let value = wrapped.call("db".to_string()).await.unwrap();
//! assert_eq!(value, "db ready");
//! assert_eq!(calls.load(Ordering::SeqCst), 3);
//! # });
//! ```
//!
//! ## Failure taxonomy
//!
//! A wrapped invocation settles exactly once, with the success value or one
//! [`RetryError`]: the final attempt's own failure, a policy-evaluation
//! failure (which wins over the operation's failure), or a suspension
//! failure from the sleeper. A failure observer configured with
//! [`RetryConfig::with_failure_observer`] can never affect the outcome.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod eval;
pub mod sleep;
pub mod wrap;

// Re-exports
pub use config::{AttemptPolicy, DelayPolicy, RetryConfig};
pub use error::{RetryError, SleepError};
pub use eval::Eval;
pub use sleep::Sleep;
#[cfg(feature = "tokio")]
pub use sleep::TokioSleep;
pub use wrap::{wrap, Retrying};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{AttemptPolicy, DelayPolicy, RetryConfig};
    pub use crate::error::{RetryError, SleepError};
    pub use crate::eval::Eval;
    pub use crate::sleep::Sleep;
    #[cfg(feature = "tokio")]
    pub use crate::sleep::TokioSleep;
    pub use crate::wrap::{wrap, Retrying};
}
