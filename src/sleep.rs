//! The suspension primitive used between attempts.
//!
//! The retry loop treats waiting as an opaque dependency: once a retry is
//! decided, the sleeper runs exactly once with the computed delay, including
//! zero-length delays. Swapping the implementation is how tests control time
//! and how callers plug in a non-tokio timer.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;

use crate::error::SleepError;

/// Suspends an invocation between attempts.
///
/// An error from the sleeper rejects the whole invocation as a
/// [`RetryError::Suspension`](crate::RetryError::Suspension); it is never
/// swallowed or retried.
pub trait Sleep: Send + Sync {
    /// Resolve once `duration` has elapsed.
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, Result<(), SleepError>>;
}

impl<S: Sleep + ?Sized> Sleep for Arc<S> {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, Result<(), SleepError>> {
        (**self).sleep(duration)
    }
}

/// Sleeper backed by the tokio timer.
///
/// This is the default when the `tokio` feature (on by default) is enabled.
/// It requires a tokio runtime with time enabled and never fails.
#[cfg(feature = "tokio")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleep;

#[cfg(feature = "tokio")]
impl Sleep for TokioSleep {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, Result<(), SleepError>> {
        Box::pin(async move {
            tokio::time::sleep(duration).await;
            Ok(())
        })
    }
}

#[cfg(all(test, feature = "tokio"))]
mod sleep_tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_tokio_sleep_waits_at_least_the_duration() {
        let start = Instant::now();
        TokioSleep.sleep(Duration::from_millis(20)).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn test_arc_delegates_to_inner_sleeper() {
        let sleeper: Arc<dyn Sleep> = Arc::new(TokioSleep);
        assert_eq!(sleeper.sleep(Duration::ZERO).await, Ok(()));
    }
}
