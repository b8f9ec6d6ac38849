//! Retry Patterns Example
//!
//! Walks through the combinator's policies:
//! - Fixed attempt limits
//! - Predicate-driven retries
//! - Fixed and computed delays
//! - Argument rewriting between attempts
//! - Failure observation

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anew::prelude::*;

// ==================== Fixed Attempts ====================

/// Example 1: a transient failure healed by a fixed attempt limit.
async fn example_fixed_attempts() {
    println!("\n=== Example 1: Fixed Attempts ===");

    let calls = Arc::new(AtomicU32::new(0));

    let flaky = {
        let calls = calls.clone();
        move |name: String| {
            let calls = calls.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                println!("  invoking {} (call {})", name, n + 1);
                if n < 2 {
                    Err(format!("{} unavailable", name))
                } else {
                    Ok(format!("{} ready", name))
                }
            }
        }
    };

    let wrapped = wrap(flaky, RetryConfig::attempts(5));

    match wrapped.call("warehouse".to_string()).await {
        Ok(value) => println!("  resolved: {}", value),
        Err(reason) => println!("  rejected: {}", reason),
    }
}

// ==================== Predicate + Delay ====================

/// Example 2: retry only transient errors, waiting longer each time.
async fn example_predicate_with_delay() {
    println!("\n=== Example 2: Predicate + Computed Delay ===");

    let calls = Arc::new(AtomicU32::new(0));

    let op = {
        let calls = calls.clone();
        move |_: ()| {
            let calls = calls.clone();
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err("transient: connection reset".to_string())
                } else {
                    Ok(200u16)
                }
            }
        }
    };

    let config = RetryConfig::attempts_with(|reason: &String, attempt: u32, _args: &()| {
        Eval::ready(reason.starts_with("transient") && attempt < 4)
    })
    .with_delay_fn(|_reason: &String, attempt: u32, _args: &()| {
        // The caller owns backoff shape; here each wait doubles.
        Eval::ready(Duration::from_millis(50 * 2u64.pow(attempt - 1)))
    });

    let wrapped = wrap(op, config);
    println!("  status: {:?}", wrapped.call(()).await);
}

// ==================== Argument Rewriting ====================

/// Example 3: walk an argument toward a value the operation accepts.
async fn example_argument_rewriting() {
    println!("\n=== Example 3: Argument Rewriting ===");

    let lookup = |page: u32| async move {
        if page >= 3 {
            Ok(format!("contents of page {}", page))
        } else {
            Err(format!("page {} not cached yet", page))
        }
    };

    let config = RetryConfig::attempts(10)
        .with_retry_args(|_reason: &String, _attempt: u32, page: &u32| Eval::ready(Some(page + 1)));

    let wrapped = wrap(lookup, config);
    println!("  {:?}", wrapped.call(0).await);
}

// ==================== Observation ====================

/// Example 4: watch failures go by without touching control flow.
async fn example_failure_observation() {
    println!("\n=== Example 4: Failure Observation ===");

    let calls = Arc::new(AtomicU32::new(0));

    let op = {
        let calls = calls.clone();
        move |_: ()| {
            let calls = calls.clone();
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 3 {
                    Err("still flaky".to_string())
                } else {
                    Ok("settled")
                }
            }
        }
    };

    let config = RetryConfig::attempts(5)
        .with_delay(Duration::from_millis(10))
        .with_failure_observer(|reason: &String, attempt: u32, _args: &()| {
            println!("  observed failure #{}: {}", attempt, reason);
        });

    let wrapped = wrap(op, config);
    println!("  outcome: {:?}", wrapped.call(()).await);
}

#[tokio::main]
async fn main() {
    println!("anew retry patterns");

    example_fixed_attempts().await;
    example_predicate_with_delay().await;
    example_argument_rewriting().await;
    example_failure_observation().await;
}
