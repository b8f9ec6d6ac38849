//! Wrap-time configuration for retried operations.
//!
//! A [`RetryConfig`] is captured once when an operation is wrapped and
//! reused across every invocation of the wrapped operation. It is data plus
//! hooks - it describes retry behavior but does not execute it, which keeps
//! it cheap to clone and easy to inspect.
//!
//! Every hook receives the same three inputs after a failed attempt: the
//! failure reason, the 1-indexed attempt number, and the arguments the
//! failed attempt was invoked with.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::eval::Eval;
use crate::sleep::Sleep;

/// Decides whether a failed invocation is attempted again.
pub type RetryPredicate<Args, E> = Arc<dyn Fn(&E, u32, &Args) -> Eval<bool, E> + Send + Sync>;

/// Computes the wait before the next attempt.
pub type DelayFn<Args, E> = Arc<dyn Fn(&E, u32, &Args) -> Eval<Duration, E> + Send + Sync>;

/// Produces the argument list for the next attempt.
pub type ArgsRewriter<Args, E> = Arc<dyn Fn(&E, u32, &Args) -> Eval<Args, E> + Send + Sync>;

/// Observes a failed attempt; side effects only.
pub type FailureObserver<Args, E> = Arc<dyn Fn(&E, u32, &Args) + Send + Sync>;

/// How many more attempts a failed invocation gets.
pub enum AttemptPolicy<Args, E> {
    /// Retry while fewer than this many failures have been observed, so the
    /// limit bounds the total number of invocations. `Limit(0)` means any
    /// failure is terminal (and so, by the comparison, does `Limit(1)`).
    Limit(u32),
    /// Ask after each failure. The predicate may answer immediately or
    /// defer to a future; a `false` settles the invocation with the
    /// failure that prompted the question.
    Predicate(RetryPredicate<Args, E>),
}

/// How long a retried invocation waits before the next attempt.
pub enum DelayPolicy<Args, E> {
    /// Re-invoke without waiting. The sleeper still runs once with a zero
    /// delay, so a custom sleeper observes every retry.
    None,
    /// Wait a fixed duration between attempts.
    Fixed(Duration),
    /// Compute the wait per failure, immediately or via a future.
    Computed(DelayFn<Args, E>),
}

/// Immutable configuration for a wrapped operation.
///
/// Built with the constructor-plus-`with_*` pattern: the required attempt
/// policy picks the constructor, everything else is layered on.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use anew::RetryConfig;
///
/// let config: RetryConfig<u32, String> = RetryConfig::attempts(3)
///     .with_delay(Duration::from_millis(100));
///
/// assert!(!config.has_argument_rewriter());
/// ```
pub struct RetryConfig<Args, E> {
    attempts: AttemptPolicy<Args, E>,
    delay: DelayPolicy<Args, E>,
    rewrite_args: Option<ArgsRewriter<Args, E>>,
    observer: Option<FailureObserver<Args, E>>,
    sleep: Option<Arc<dyn Sleep>>,
}

impl<Args, E> RetryConfig<Args, E> {
    /// Bound the invocation to `limit` total attempts.
    ///
    /// A failed attempt is retried while the number of observed failures is
    /// still below `limit`; the failure that reaches it settles the
    /// invocation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use anew::{AttemptPolicy, RetryConfig};
    ///
    /// let config: RetryConfig<(), String> = RetryConfig::attempts(5);
    /// assert!(matches!(config.attempt_policy(), AttemptPolicy::Limit(5)));
    /// ```
    pub fn attempts(limit: u32) -> Self {
        Self::with_attempt_policy(AttemptPolicy::Limit(limit))
    }

    /// Decide each retry with a predicate instead of a fixed limit.
    ///
    /// The predicate sees the failure reason, the 1-indexed attempt number,
    /// and the current (pre-rewrite) arguments.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use anew::{Eval, RetryConfig};
    ///
    /// let config: RetryConfig<u32, String> =
    ///     RetryConfig::attempts_with(|_reason: &String, attempt: u32, _args: &u32| {
    ///         Eval::ready(attempt < 3)
    ///     });
    /// ```
    pub fn attempts_with<F>(predicate: F) -> Self
    where
        F: Fn(&E, u32, &Args) -> Eval<bool, E> + Send + Sync + 'static,
    {
        Self::with_attempt_policy(AttemptPolicy::Predicate(Arc::new(predicate)))
    }

    fn with_attempt_policy(attempts: AttemptPolicy<Args, E>) -> Self {
        Self {
            attempts,
            delay: DelayPolicy::None,
            rewrite_args: None,
            observer: None,
            sleep: None,
        }
    }

    /// Wait a fixed duration before every retry.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = DelayPolicy::Fixed(delay);
        self
    }

    /// Compute the wait per failure.
    ///
    /// The returned value is passed to the sleeper uninterpreted - no
    /// clamping or rounding happens here.
    pub fn with_delay_fn<F>(mut self, delay: F) -> Self
    where
        F: Fn(&E, u32, &Args) -> Eval<Duration, E> + Send + Sync + 'static,
    {
        self.delay = DelayPolicy::Computed(Arc::new(delay));
        self
    }

    /// Rewrite the arguments for the next attempt.
    ///
    /// The rewriter receives the previous attempt's arguments and returns
    /// the full replacement list; returning `None` means the next attempt
    /// is invoked with no arguments (`Args::default()`), never "keep the
    /// previous arguments". It runs after every failure, even when the
    /// retry decision turns out to be final, so it should be effect-free
    /// or idempotent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use anew::{Eval, RetryConfig};
    ///
    /// let config: RetryConfig<u32, String> = RetryConfig::attempts(3)
    ///     .with_retry_args(|_reason: &String, _attempt: u32, n: &u32| {
    ///         Eval::ready(Some(n + 1))
    ///     });
    /// ```
    pub fn with_retry_args<F>(mut self, rewrite: F) -> Self
    where
        Args: Default + 'static,
        E: 'static,
        F: Fn(&E, u32, &Args) -> Eval<Option<Args>, E> + Send + Sync + 'static,
    {
        self.rewrite_args = Some(Arc::new(move |reason: &E, attempt: u32, args: &Args| {
            rewrite(reason, attempt, args).map(|next| next.unwrap_or_default())
        }));
        self
    }

    /// Observe each failed attempt.
    ///
    /// Runs once per failure, before the retry decision, and never on
    /// success. Its outcome cannot affect control flow: a panicking
    /// observer is caught and discarded.
    pub fn with_failure_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(&E, u32, &Args) + Send + Sync + 'static,
    {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Replace the suspension primitive.
    ///
    /// Without an override, the tokio timer is used (requires the `tokio`
    /// feature, on by default).
    pub fn with_sleep<S>(mut self, sleeper: S) -> Self
    where
        S: Sleep + 'static,
    {
        self.sleep = Some(Arc::new(sleeper));
        self
    }

    /// The attempt policy.
    pub fn attempt_policy(&self) -> &AttemptPolicy<Args, E> {
        &self.attempts
    }

    /// The delay policy.
    pub fn delay_policy(&self) -> &DelayPolicy<Args, E> {
        &self.delay
    }

    /// Whether an argument rewriter is configured.
    pub fn has_argument_rewriter(&self) -> bool {
        self.rewrite_args.is_some()
    }

    /// Whether a failure observer is configured.
    pub fn has_failure_observer(&self) -> bool {
        self.observer.is_some()
    }

    pub(crate) fn rewriter(&self) -> Option<&ArgsRewriter<Args, E>> {
        self.rewrite_args.as_ref()
    }

    pub(crate) fn observer(&self) -> Option<&FailureObserver<Args, E>> {
        self.observer.as_ref()
    }

    pub(crate) fn sleeper(&self) -> Option<&Arc<dyn Sleep>> {
        self.sleep.as_ref()
    }
}

impl<Args, E> Clone for AttemptPolicy<Args, E> {
    fn clone(&self) -> Self {
        match self {
            Self::Limit(n) => Self::Limit(*n),
            Self::Predicate(p) => Self::Predicate(Arc::clone(p)),
        }
    }
}

impl<Args, E> Clone for DelayPolicy<Args, E> {
    fn clone(&self) -> Self {
        match self {
            Self::None => Self::None,
            Self::Fixed(d) => Self::Fixed(*d),
            Self::Computed(f) => Self::Computed(Arc::clone(f)),
        }
    }
}

impl<Args, E> Clone for RetryConfig<Args, E> {
    fn clone(&self) -> Self {
        Self {
            attempts: self.attempts.clone(),
            delay: self.delay.clone(),
            rewrite_args: self.rewrite_args.clone(),
            observer: self.observer.clone(),
            sleep: self.sleep.clone(),
        }
    }
}

impl<Args, E> fmt::Debug for AttemptPolicy<Args, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Limit(n) => f.debug_tuple("Limit").field(n).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl<Args, E> fmt::Debug for DelayPolicy<Args, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Fixed(d) => f.debug_tuple("Fixed").field(d).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl<Args, E> fmt::Debug for RetryConfig<Args, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryConfig")
            .field("attempts", &self.attempts)
            .field("delay", &self.delay)
            .field("rewrite_args", &self.rewrite_args.is_some())
            .field("observer", &self.observer.is_some())
            .field("sleep", &self.sleep.is_some())
            .finish()
    }
}
