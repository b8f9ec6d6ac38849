//! A value that is either already computed or must be awaited.
//!
//! Retry hooks (the attempt predicate, the delay function, the argument
//! rewriter) may answer synchronously or by handing back a future. `Eval`
//! captures both shapes in one type so the retry loop can normalize them
//! with a single [`resolve`](Eval::resolve) step instead of branching on
//! "was this async?" at every call site.
//!
//! # Examples
//!
//! ```rust
//! use anew::Eval;
//!
//! # tokio_test::block_on(async {
//! let now: Eval<i32, String> = Eval::ready(1);
//! assert_eq!(now.resolve().await, Ok(1));
//!
//! let later: Eval<i32, String> = Eval::deferred(async { Ok(2) });
//! assert_eq!(later.resolve().await, Ok(2));
//! # });
//! ```

use std::fmt;
use std::future::Future;

use futures::future::BoxFuture;

/// An outcome that is available immediately or after awaiting a future.
///
/// Both variants carry a `Result` so a hook can fail synchronously
/// (`Immediate(Err(..))`) or from inside its future. The retry loop treats
/// either failure as fatal to the invocation.
pub enum Eval<T, E> {
    /// An already-computed outcome.
    Immediate(Result<T, E>),
    /// An outcome that must be awaited.
    Deferred(BoxFuture<'static, Result<T, E>>),
}

impl<T, E> Eval<T, E> {
    /// An immediately available value.
    pub fn ready(value: T) -> Self {
        Eval::Immediate(Ok(value))
    }

    /// An immediate failure.
    pub fn fail(error: E) -> Self {
        Eval::Immediate(Err(error))
    }

    /// An immediate outcome from an existing `Result`.
    pub fn from_result(result: Result<T, E>) -> Self {
        Eval::Immediate(result)
    }

    /// An outcome produced by awaiting `future`.
    ///
    /// The future is boxed; it must own everything it needs, so hooks that
    /// defer should clone what they capture out of their borrowed inputs.
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        Eval::Deferred(Box::pin(future))
    }

    /// Returns true if the outcome is available without awaiting.
    pub fn is_immediate(&self) -> bool {
        matches!(self, Eval::Immediate(_))
    }

    /// Returns true if the outcome must be awaited.
    pub fn is_deferred(&self) -> bool {
        matches!(self, Eval::Deferred(_))
    }

    /// Await the outcome if needed and return it.
    pub async fn resolve(self) -> Result<T, E> {
        match self {
            Eval::Immediate(result) => result,
            Eval::Deferred(future) => future.await,
        }
    }

    /// Transform a successful outcome, immediately or once it resolves.
    pub fn map<U, F>(self, f: F) -> Eval<U, E>
    where
        F: FnOnce(T) -> U + Send + 'static,
        T: 'static,
        U: 'static,
        E: 'static,
    {
        match self {
            Eval::Immediate(result) => Eval::Immediate(result.map(f)),
            Eval::Deferred(future) => Eval::Deferred(Box::pin(async move { future.await.map(f) })),
        }
    }
}

impl<T, E> fmt::Debug for Eval<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Eval::Immediate(_) => f.write_str("Eval::Immediate(..)"),
            Eval::Deferred(_) => f.write_str("Eval::Deferred(..)"),
        }
    }
}
