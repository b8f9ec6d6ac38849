//! Property-based tests for the fixed attempt-count law.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use proptest::prelude::*;

use anew::{wrap, RetryConfig, RetryError, Sleep, SleepError};

/// Sleeper that resolves immediately so properties stay off the clock.
#[derive(Debug, Clone, Copy)]
struct InstantSleep;

impl Sleep for InstantSleep {
    fn sleep(&self, _duration: Duration) -> BoxFuture<'static, Result<(), SleepError>> {
        Box::pin(futures::future::ready(Ok(())))
    }
}

proptest! {
    /// With a fixed limit, the number of invocations and the settled
    /// outcome are fully determined by how often the operation fails.
    #[test]
    fn prop_fixed_limit_bounds_invocations(limit in 0u32..6, failures in 0u32..6) {
        let calls = Arc::new(AtomicU32::new(0));

        let op = {
            let calls = calls.clone();
            move |_: ()| {
                let calls = calls.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    if n < failures {
                        Err(format!("failure {}", n + 1))
                    } else {
                        Ok("done")
                    }
                }
            }
        };

        let wrapped = wrap(op, RetryConfig::attempts(limit).with_sleep(InstantSleep));
        let result = futures::executor::block_on(wrapped.call(()));

        // The first attempt always runs, so a limit of zero still invokes once.
        let effective = limit.max(1);
        if failures < effective {
            prop_assert_eq!(result, Ok("done"));
            prop_assert_eq!(calls.load(Ordering::SeqCst), failures + 1);
        } else {
            prop_assert_eq!(
                result,
                Err(RetryError::Operation(format!("failure {}", effective)))
            );
            prop_assert_eq!(calls.load(Ordering::SeqCst), effective);
        }
    }

    /// Without a rewriter, every attempt sees the original arguments.
    #[test]
    fn prop_arguments_are_stable_without_a_rewriter(
        args in prop::collection::vec(any::<i32>(), 0..8),
        failures in 0u32..4,
    ) {
        let calls = Arc::new(AtomicU32::new(0));
        let received = Arc::new(std::sync::Mutex::new(Vec::new()));

        let op = {
            let calls = calls.clone();
            let received = received.clone();
            move |args: Vec<i32>| {
                let calls = calls.clone();
                let received = received.clone();
                async move {
                    received.lock().unwrap().push(args);
                    if calls.fetch_add(1, Ordering::SeqCst) < failures {
                        Err("not yet".to_string())
                    } else {
                        Ok(())
                    }
                }
            }
        };

        let wrapped = wrap(op, RetryConfig::attempts(10).with_sleep(InstantSleep));
        let result = futures::executor::block_on(wrapped.call(args.clone()));

        prop_assert_eq!(result, Ok(()));
        let seen = received.lock().unwrap().clone();
        prop_assert_eq!(seen.len() as u32, failures + 1);
        prop_assert!(seen.iter().all(|seen_args| *seen_args == args));
    }
}
