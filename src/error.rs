//! Error types for wrapped invocations.

use std::fmt;

/// The single failure a wrapped invocation settles with.
///
/// Exactly one of these (or a success value) reaches the caller per
/// invocation. `Policy` and `Suspension` failures take precedence over the
/// operation's own failure: a broken hook or timer rejects the invocation
/// immediately, even when a retry was still permitted.
///
/// # Examples
///
/// ```rust
/// use anew::{wrap, RetryConfig, RetryError};
///
/// # tokio_test::block_on(async {
/// let always = |_: ()| async { Err::<i32, _>("down") };
/// let wrapped = wrap(always, RetryConfig::attempts(1));
///
/// match wrapped.call(()).await {
///     Err(RetryError::Operation(reason)) => assert_eq!(reason, "down"),
///     other => panic!("unexpected outcome: {:?}", other),
/// }
/// # });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryError<E> {
    /// The final attempt's own failure; no further retry was made.
    Operation(E),
    /// The attempt predicate, delay function, or argument rewriter failed.
    Policy(E),
    /// The suspension primitive failed while waiting between attempts.
    Suspension(SleepError),
}

impl<E> RetryError<E> {
    /// Returns true if this is the operation's own failure.
    pub fn is_operation(&self) -> bool {
        matches!(self, Self::Operation(_))
    }

    /// Returns true if a retry hook failed while being evaluated.
    pub fn is_policy(&self) -> bool {
        matches!(self, Self::Policy(_))
    }

    /// Returns true if the wait between attempts failed.
    pub fn is_suspension(&self) -> bool {
        matches!(self, Self::Suspension(_))
    }

    /// Get the underlying reason, whether it came from the operation or a
    /// policy hook. `None` for suspension failures.
    pub fn reason(&self) -> Option<&E> {
        match self {
            Self::Operation(e) | Self::Policy(e) => Some(e),
            Self::Suspension(_) => None,
        }
    }

    /// Extract the underlying reason, discarding which stage produced it.
    pub fn into_inner(self) -> Option<E> {
        match self {
            Self::Operation(e) | Self::Policy(e) => Some(e),
            Self::Suspension(_) => None,
        }
    }
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operation(e) => write!(f, "{}", e),
            Self::Policy(e) => write!(f, "retry policy evaluation failed: {}", e),
            Self::Suspension(e) => write!(f, "{}", e),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for RetryError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Operation(e) | Self::Policy(e) => Some(e),
            Self::Suspension(e) => Some(e),
        }
    }
}

/// Error from the suspension primitive.
///
/// The built-in tokio sleeper never produces one; custom [`Sleep`]
/// implementations report timer failures with it, and those failures are
/// passed through to the caller rather than swallowed.
///
/// [`Sleep`]: crate::sleep::Sleep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SleepError {
    message: String,
}

impl SleepError {
    /// Create a suspension error with a descriptive message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The descriptive message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SleepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "suspension failed: {}", self.message)
    }
}

impl std::error::Error for SleepError {}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn test_operation_displays_bare_reason() {
        let err: RetryError<String> = RetryError::Operation("connection refused".to_string());
        assert_eq!(format!("{}", err), "connection refused");
        assert!(err.is_operation());
        assert_eq!(err.into_inner(), Some("connection refused".to_string()));
    }

    #[test]
    fn test_policy_display_names_the_stage() {
        let err: RetryError<String> = RetryError::Policy("bad predicate".to_string());
        let display = format!("{}", err);
        assert!(display.contains("retry policy"));
        assert!(display.contains("bad predicate"));
        assert!(err.is_policy());
    }

    #[test]
    fn test_suspension_carries_sleep_error() {
        let err: RetryError<String> = RetryError::Suspension(SleepError::new("timer gone"));
        assert!(err.is_suspension());
        assert!(err.reason().is_none());
        assert!(err.into_inner().is_none());
    }

    #[test]
    fn test_sleep_error_display() {
        let err = SleepError::new("timer wheel shut down");
        let display = format!("{}", err);
        assert!(display.contains("suspension failed"));
        assert!(display.contains("timer wheel shut down"));
        assert_eq!(err.message(), "timer wheel shut down");
    }

    #[test]
    fn test_source_points_at_inner_error() {
        use std::error::Error;

        let inner = SleepError::new("broken");
        let err: RetryError<SleepError> = RetryError::Suspension(inner);
        assert!(err.source().is_some());
    }
}
