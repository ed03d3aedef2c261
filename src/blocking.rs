// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Thread-blocking variant of the admission gate.
//!
//! Same window rule as [`crate::RateLimitedGate`], for callers on plain
//! threads. Waiters sleep on a `Condvar` paired with the window mutex; each
//! wait is bounded by the end of the current window (and the caller's own
//! deadline, if any) and re-checks the window on wake.

use crate::config::GateConfig;
use crate::error::{InvalidConfiguration, SubmitError};
use crate::gate::validate;
use crate::metrics::{GateMetrics, Recorder, WaitGuard};
use crate::submitter::BlockingSubmitter;
use crate::window::{Admission, Window, WindowSnapshot};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Limits how many submissions may start within each window, blocking the
/// calling thread while the window is full.
#[derive(Debug)]
pub struct BlockingGate<S> {
    limit: u32,
    duration: Duration,
    window: Mutex<Window>,
    rollover: Condvar,
    submitter: S,
    metrics: Recorder,
}

impl<S> BlockingGate<S> {
    pub fn new(limit: u32, window: Duration, submitter: S) -> Result<Self, InvalidConfiguration> {
        validate(limit, window)?;

        Ok(Self {
            limit,
            duration: window,
            window: Mutex::new(Window::new(Instant::now(), window)),
            rollover: Condvar::new(),
            submitter,
            metrics: Recorder::default(),
        })
    }

    pub fn from_config(config: &GateConfig, submitter: S) -> Result<Self, InvalidConfiguration> {
        Self::new(config.limit, config.window_duration(), submitter)
    }

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

    pub fn snapshot(&self) -> WindowSnapshot {
        WindowSnapshot::capture(&self.lock_window(), self.limit)
    }

    /// Block until admitted, then call the collaborator and return its
    /// result unchanged.
    pub fn submit<P>(&self, payload: P) -> Result<S::Output, S::Error>
    where
        S: BlockingSubmitter<P>,
    {
        self.admit(None);
        self.forward(payload)
    }

    /// Block for at most `timeout` waiting for admission.
    pub fn submit_timeout<P>(
        &self,
        payload: P,
        timeout: Duration,
    ) -> Result<S::Output, SubmitError<S::Error>>
    where
        S: BlockingSubmitter<P>,
    {
        let deadline = Instant::now().checked_add(timeout);
        if !self.admit(deadline) {
            self.metrics.cancelled();
            info!(limit = self.limit, ?timeout, "Submission timed out waiting for admission");
            return Err(SubmitError::Cancelled);
        }
        self.forward(payload).map_err(SubmitError::Submission)
    }

    /// Take a slot. Returns `false` if `deadline` passed first.
    fn admit(&self, deadline: Option<Instant>) -> bool {
        let mut window = self.lock_window();
        let mut waiting: Option<WaitGuard<'_>> = None;

        loop {
            let now = Instant::now();
            let resets_at = match window.try_admit(now, self.limit) {
                Admission::Admitted {
                    rolled_over,
                    remaining,
                } => {
                    if rolled_over {
                        info!(limit = self.limit, "Rate limit window reset");
                        self.rollover.notify_all();
                    }
                    self.metrics.admitted(rolled_over);
                    debug!(remaining, "Submission admitted");
                    return true;
                }
                Admission::Full { resets_at } => resets_at,
            };

            let caller_left = deadline.map(|d| d.saturating_duration_since(now));
            if caller_left == Some(Duration::ZERO) {
                return false;
            }

            if waiting.is_none() {
                waiting = Some(self.metrics.wait_started());
            }

            let window_left = resets_at.map(|end| end.saturating_duration_since(now));
            window = match window_left.into_iter().chain(caller_left).min() {
                Some(wait_for) => {
                    debug!(retry_after = ?wait_for, "Window full, waiting for rollover");
                    self.rollover
                        .wait_timeout(window, wait_for)
                        .map(|(guard, _)| guard)
                        .unwrap_or_else(|poisoned| poisoned.into_inner().0)
                }
                None => self
                    .rollover
                    .wait(window)
                    .unwrap_or_else(PoisonError::into_inner),
            };
        }
    }

    fn forward<P>(&self, payload: P) -> Result<S::Output, S::Error>
    where
        S: BlockingSubmitter<P>,
    {
        let result = self.submitter.submit(payload);
        if result.is_err() {
            self.metrics.submit_failed();
            warn!("Submission collaborator returned an error");
        }
        result
    }

    fn lock_window(&self) -> MutexGuard<'_, Window> {
        self.window.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
