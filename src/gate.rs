// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Async rolling-window admission gate.
//!
//! At most `limit` submissions may start per window. Callers that find the
//! window full suspend until it rolls over and then compete again; a wake-up
//! is never taken as an admission.
//!
//! The window lives behind a `std::sync::Mutex` that is only held for the
//! bookkeeping, never across an `.await`. A waiter registers on the gate's
//! `Notify` while it still holds that lock, so a rollover performed by any
//! other caller after the check cannot be missed. Each wait is also bounded
//! by the end of the current window, which covers the case where no other
//! caller arrives to perform the reset.
//!
//! The collaborator runs after the lock is released: a slow submission never
//! delays other callers' admission decisions.

use crate::config::GateConfig;
use crate::error::{InvalidConfiguration, SubmitError};
use crate::metrics::{GateMetrics, Recorder, WaitGuard};
use crate::submitter::Submitter;
use crate::window::{Admission, Window, WindowSnapshot};
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

/// Limits how many submissions may start within each window.
///
/// Share it between tasks with an `Arc`.
#[derive(Debug)]
pub struct RateLimitedGate<S> {
    limit: u32,
    duration: Duration,
    window: Mutex<Window>,
    rollover: Notify,
    submitter: S,
    metrics: Recorder,
}

impl<S> RateLimitedGate<S> {
    /// Create a gate admitting `limit` submissions per `window`.
    ///
    /// The first window starts now.
    pub fn new(limit: u32, window: Duration, submitter: S) -> Result<Self, InvalidConfiguration> {
        validate(limit, window)?;

        Ok(Self {
            limit,
            duration: window,
            window: Mutex::new(Window::new(Instant::now().into_std(), window)),
            rollover: Notify::new(),
            submitter,
            metrics: Recorder::default(),
        })
    }

    pub fn from_config(config: &GateConfig, submitter: S) -> Result<Self, InvalidConfiguration> {
        Self::new(config.limit, config.window_duration(), submitter)
    }

    /// Record gate activity into `metrics`.
    pub fn with_metrics(mut self, metrics: GateMetrics) -> Self {
        self.metrics = Recorder::new(metrics);
        self
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn window_duration(&self) -> Duration {
        self.duration
    }

    /// Window state as of the last admission decision.
    ///
    /// An elapsed window is only reset by the next caller, so the count may
    /// belong to a window that has already ended.
    pub fn snapshot(&self) -> WindowSnapshot {
        WindowSnapshot::capture(&self.lock_window(), self.limit)
    }

    /// Wait for admission, then forward `payload` to the collaborator and
    /// return its result unchanged.
    ///
    /// Dropping the returned future while it waits gives up without taking
    /// a slot.
    pub async fn submit<P>(&self, payload: P) -> Result<S::Output, S::Error>
    where
        S: Submitter<P>,
    {
        self.admit().await;
        self.forward(payload).await
    }

    /// Like [`submit`](Self::submit), but gives up with
    /// [`SubmitError::Cancelled`] if `cancel` completes before admission.
    ///
    /// Once admitted the collaborator call is not affected by `cancel`.
    pub async fn submit_until<P, C>(
        &self,
        payload: P,
        cancel: C,
    ) -> Result<S::Output, SubmitError<S::Error>>
    where
        S: Submitter<P>,
        C: Future,
    {
        tokio::select! {
            biased;
            () = self.admit() => {}
            _ = cancel => {
                self.metrics.cancelled();
                info!(limit = self.limit, "Submission cancelled while waiting for admission");
                return Err(SubmitError::Cancelled);
            }
        }

        self.forward(payload).await.map_err(SubmitError::Submission)
    }

    /// Like [`submit`](Self::submit), but gives up after waiting `timeout`
    /// for admission.
    pub async fn submit_timeout<P>(
        &self,
        payload: P,
        timeout: Duration,
    ) -> Result<S::Output, SubmitError<S::Error>>
    where
        S: Submitter<P>,
    {
        self.submit_until(payload, time::sleep(timeout)).await
    }

    /// Take a slot, suspending until one is available.
    async fn admit(&self) {
        let mut waiting: Option<WaitGuard<'_>> = None;

        loop {
            let notified = self.rollover.notified();
            tokio::pin!(notified);

            let resets_at = {
                let mut window = self.lock_window();
                match window.try_admit(Instant::now().into_std(), self.limit) {
                    Admission::Admitted {
                        rolled_over,
                        remaining,
                    } => {
                        if rolled_over {
                            info!(limit = self.limit, "Rate limit window reset");
                            self.rollover.notify_waiters();
                        }
                        self.metrics.admitted(rolled_over);
                        debug!(remaining, "Submission admitted");
                        return;
                    }
                    Admission::Full { resets_at } => {
                        // Registered under the lock: a reset after this point wakes us.
                        notified.as_mut().enable();
                        resets_at
                    }
                }
            };

            if waiting.is_none() {
                waiting = Some(self.metrics.wait_started());
            }

            match resets_at {
                Some(deadline) => {
                    debug!(
                        retry_after = ?deadline.saturating_duration_since(Instant::now().into_std()),
                        "Window full, waiting for rollover"
                    );
                    tokio::select! {
                        () = &mut notified => {}
                        () = time::sleep_until(Instant::from_std(deadline)) => {}
                    }
                }
                None => notified.await,
            }
        }
    }

    async fn forward<P>(&self, payload: P) -> Result<S::Output, S::Error>
    where
        S: Submitter<P>,
    {
        let result = self.submitter.submit(payload).await;
        if result.is_err() {
            self.metrics.submit_failed();
            warn!("Submission collaborator returned an error");
        }
        result
    }

    fn lock_window(&self) -> MutexGuard<'_, Window> {
        // Every mutation of the window completes before the guard drops, so
        // a poisoned lock still holds a consistent value.
        self.window.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Reject a non-positive limit or window.
pub(crate) fn validate(limit: u32, window: Duration) -> Result<(), InvalidConfiguration> {
    if limit == 0 {
        return Err(InvalidConfiguration::new("limit", "must be at least 1"));
    }
    if window.is_zero() {
        return Err(InvalidConfiguration::new(
            "window",
            "duration must be greater than zero",
        ));
    }
    Ok(())
}
