//! The retry combinator itself.
//!
//! [`wrap`] pairs an asynchronous operation with a [`RetryConfig`] and
//! returns a [`Retrying`] value whose [`call`](Retrying::call) re-invokes
//! the operation on failure until the attempt policy says stop.

use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use futures::future::{try_join3, BoxFuture};

use crate::config::{AttemptPolicy, DelayPolicy, RetryConfig};
use crate::error::{RetryError, SleepError};
use crate::eval::Eval;
use crate::sleep::Sleep;

/// Wrap an asynchronous operation with retry behavior.
///
/// The operation is invoked fresh on every attempt with the current
/// argument value; the configuration is captured once and reused across
/// all invocations of the wrapped operation.
///
/// # Examples
///
/// ```rust
/// use anew::{wrap, Eval, RetryConfig};
///
/// # tokio_test::block_on(async {
/// let threshold = |n: u32| async move {
///     if n < 3 {
///         Err(format!("too small: {}", n))
///     } else {
///         Ok(n * 2)
///     }
/// };
///
/// // Bump the argument on every failure until the operation accepts it.
/// let config = RetryConfig::attempts(5)
///     .with_retry_args(|_reason: &String, _attempt: u32, n: &u32| Eval::ready(Some(n + 1)));
///
/// let wrapped = wrap(threshold, config);
/// assert_eq!(wrapped.call(1).await.unwrap(), 6);
/// # });
/// ```
pub fn wrap<Op, Fut, T, Args, E>(op: Op, config: RetryConfig<Args, E>) -> Retrying<Op, Args, E>
where
    Op: Fn(Args) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    Args: Clone,
{
    Retrying { op, config }
}

/// An operation wrapped with retry behavior.
///
/// Created by [`wrap`]. Invocations through [`call`](Retrying::call) are
/// fully independent: each gets its own attempt counter and argument state,
/// so a `Retrying` can be called concurrently through a shared reference.
pub struct Retrying<Op, Args, E> {
    op: Op,
    config: RetryConfig<Args, E>,
}

impl<Op, Args, E> Retrying<Op, Args, E> {
    /// The configuration captured at wrap time.
    pub fn config(&self) -> &RetryConfig<Args, E> {
        &self.config
    }

    /// Invoke the wrapped operation.
    ///
    /// Resolves with the first successful attempt's value, or rejects with
    /// the final attempt's failure once the attempt policy declines a
    /// retry. A failure while evaluating the attempt predicate, delay
    /// function, or argument rewriter - or from the sleeper itself -
    /// rejects immediately and takes precedence over the operation's own
    /// failure.
    ///
    /// There is no cancellation primitive: dropping the returned future
    /// abandons the invocation wherever it is suspended. Callers that need
    /// a deadline can race this future against one.
    pub async fn call<T, Fut>(&self, args: Args) -> Result<T, RetryError<E>>
    where
        Op: Fn(Args) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        Args: Clone,
    {
        let mut used_attempts: u32 = 0;
        let mut current_args = args;

        loop {
            let reason = match (self.op)(current_args.clone()).await {
                Ok(value) => return Ok(value),
                Err(reason) => reason,
            };
            used_attempts += 1;

            #[cfg(feature = "tracing")]
            tracing::debug!(attempt = used_attempts, "attempt failed");

            // Observer first; its outcome must never reach the decision.
            if let Some(observe) = self.config.observer() {
                let _ = catch_unwind(AssertUnwindSafe(|| {
                    observe(&reason, used_attempts, &current_args)
                }));
            }

            // All three against the current, pre-rewrite arguments. The
            // rewriter runs even when the decision ends up "stop".
            let next_args = match self.config.rewriter() {
                Some(rewrite) => rewrite(&reason, used_attempts, &current_args),
                None => Eval::ready(current_args.clone()),
            };
            let should_retry = match self.config.attempt_policy() {
                AttemptPolicy::Limit(limit) => Eval::ready(used_attempts < *limit),
                AttemptPolicy::Predicate(decide) => decide(&reason, used_attempts, &current_args),
            };
            let next_delay = match self.config.delay_policy() {
                DelayPolicy::None => Eval::ready(Duration::ZERO),
                DelayPolicy::Fixed(delay) => Eval::ready(*delay),
                DelayPolicy::Computed(compute) => compute(&reason, used_attempts, &current_args),
            };

            let (should_retry, next_delay, next_args) = try_join3(
                should_retry.resolve(),
                next_delay.resolve(),
                next_args.resolve(),
            )
            .await
            .map_err(RetryError::Policy)?;

            if !should_retry {
                return Err(RetryError::Operation(reason));
            }

            #[cfg(feature = "tracing")]
            tracing::debug!(attempt = used_attempts, delay = ?next_delay, "retrying");

            self.suspend(next_delay)
                .await
                .map_err(RetryError::Suspension)?;
            current_args = next_args;
        }
    }

    fn suspend(&self, delay: Duration) -> BoxFuture<'static, Result<(), SleepError>> {
        match self.config.sleeper() {
            Some(sleeper) => sleeper.sleep(delay),
            None => default_sleep(delay),
        }
    }
}

#[cfg(feature = "tokio")]
fn default_sleep(delay: Duration) -> BoxFuture<'static, Result<(), SleepError>> {
    crate::sleep::TokioSleep.sleep(delay)
}

#[cfg(not(feature = "tokio"))]
fn default_sleep(_delay: Duration) -> BoxFuture<'static, Result<(), SleepError>> {
    Box::pin(futures::future::ready(Err(SleepError::new(
        "no sleeper available: enable the `tokio` feature or supply one with `with_sleep`",
    ))))
}

impl<Op: Clone, Args, E> Clone for Retrying<Op, Args, E> {
    fn clone(&self) -> Self {
        Self {
            op: self.op.clone(),
            config: self.config.clone(),
        }
    }
}

impl<Op, Args, E> std::fmt::Debug for Retrying<Op, Args, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retrying")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(all(test, feature = "tracing", feature = "tokio"))]
mod tracing_tests {
    use super::*;
    use tracing_test::traced_test;

    #[traced_test]
    #[tokio::test]
    async fn test_retry_emits_debug_events() {
        let flaky = |n: u32| async move {
            if n == 0 {
                Err("first try".to_string())
            } else {
                Ok(n)
            }
        };
        let config = RetryConfig::attempts(2)
            .with_retry_args(|_r: &String, _n: u32, a: &u32| Eval::ready(Some(a + 1)));

        let wrapped = wrap(flaky, config);
        assert_eq!(wrapped.call(0).await, Ok(1));
        assert!(logs_contain("attempt failed"));
        assert!(logs_contain("retrying"));
    }
}
