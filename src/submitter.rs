// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! The submission capability the gates forward admitted calls to.
//!
//! A collaborator is anything that turns a payload into a result. The gates
//! never look at either side; they only decide when the call may start.

use std::future::Future;

/// Asynchronous submission collaborator used by [`crate::RateLimitedGate`].
pub trait Submitter<P>: Send + Sync {
    type Output: Send;
    type Error: Send;

    fn submit(&self, payload: P) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send;
}

/// Synchronous submission collaborator used by [`crate::BlockingGate`].
pub trait BlockingSubmitter<P>: Send + Sync {
    type Output;
    type Error;

    fn submit(&self, payload: P) -> Result<Self::Output, Self::Error>;
}

/// Collaborator backed by an async closure. See [`from_fn`].
#[derive(Debug, Clone)]
pub struct FnSubmitter<F>(F);

/// Collaborator backed by a blocking closure. See [`from_blocking_fn`].
#[derive(Debug, Clone)]
pub struct BlockingFnSubmitter<F>(F);

/// Wrap a closure returning a future as a [`Submitter`].
///
/// ```
/// use std::convert::Infallible;
/// use submission_gate::submitter::{from_fn, Submitter};
///
/// let echo = from_fn(|payload: String| async move { Ok::<_, Infallible>(payload) });
/// # let _ = echo;
/// ```
pub fn from_fn<F>(f: F) -> FnSubmitter<F> {
    FnSubmitter(f)
}

/// Wrap a plain closure as a [`BlockingSubmitter`].
pub fn from_blocking_fn<F>(f: F) -> BlockingFnSubmitter<F> {
    BlockingFnSubmitter(f)
}

impl<P, F, Fut, T, E> Submitter<P> for FnSubmitter<F>
where
    F: Fn(P) -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, E>> + Send,
    T: Send,
    E: Send,
{
    type Output = T;
    type Error = E;

    fn submit(&self, payload: P) -> impl Future<Output = Result<T, E>> + Send {
        (self.0)(payload)
    }
}

impl<P, F, T, E> BlockingSubmitter<P> for BlockingFnSubmitter<F>
where
    F: Fn(P) -> Result<T, E> + Send + Sync,
{
    type Output = T;
    type Error = E;

    fn submit(&self, payload: P) -> Result<T, E> {
        (self.0)(payload)
    }
}
