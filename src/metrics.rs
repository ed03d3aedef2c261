// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus instrumentation for the gates.

use prometheus::{IntCounter, IntGauge, Registry};

/// Counters describing gate activity.
///
/// Handles are cheap to clone; clones share the underlying values.
#[derive(Debug, Clone)]
pub struct GateMetrics {
    /// Calls admitted to the collaborator
    pub admitted: IntCounter,
    /// Times a caller found the window full and suspended
    pub waits: IntCounter,
    /// Waiting callers that gave up before admission
    pub cancelled: IntCounter,
    /// Windows opened after the previous one elapsed
    pub window_resets: IntCounter,
    /// Collaborator calls that returned an error
    pub submit_failures: IntCounter,
    /// Callers currently suspended
    pub waiting: IntGauge,
}

impl GateMetrics {
    /// Create the metrics and register them with `registry`.
    pub fn register(registry: &Registry) -> prometheus::Result<Self> {
        let metrics = Self {
            admitted: IntCounter::new(
                "submission_gate_admitted_total",
                "Submissions admitted through the gate",
            )?,
            waits: IntCounter::new(
                "submission_gate_waits_total",
                "Times a caller waited for the window to roll over",
            )?,
            cancelled: IntCounter::new(
                "submission_gate_cancelled_total",
                "Callers that gave up waiting for admission",
            )?,
            window_resets: IntCounter::new(
                "submission_gate_window_resets_total",
                "Rate limit windows opened after the previous one elapsed",
            )?,
            submit_failures: IntCounter::new(
                "submission_gate_submit_failures_total",
                "Admitted submissions whose collaborator returned an error",
            )?,
            waiting: IntGauge::new(
                "submission_gate_waiting",
                "Callers currently waiting for admission",
            )?,
        };

        registry.register(Box::new(metrics.admitted.clone()))?;
        registry.register(Box::new(metrics.waits.clone()))?;
        registry.register(Box::new(metrics.cancelled.clone()))?;
        registry.register(Box::new(metrics.window_resets.clone()))?;
        registry.register(Box::new(metrics.submit_failures.clone()))?;
        registry.register(Box::new(metrics.waiting.clone()))?;

        Ok(metrics)
    }
}

/// Optional metrics, so the gates can record unconditionally.
#[derive(Debug, Clone, Default)]
pub(crate) struct Recorder(Option<GateMetrics>);

impl Recorder {
    pub(crate) fn new(metrics: GateMetrics) -> Self {
        Self(Some(metrics))
    }

    pub(crate) fn admitted(&self, rolled_over: bool) {
        if let Some(m) = &self.0 {
            m.admitted.inc();
            if rolled_over {
                m.window_resets.inc();
            }
        }
    }

    /// Count a wait; the waiting gauge stays raised until the guard drops.
    pub(crate) fn wait_started(&self) -> WaitGuard<'_> {
        if let Some(m) = &self.0 {
            m.waits.inc();
            m.waiting.inc();
        }
        WaitGuard(self)
    }

    pub(crate) fn cancelled(&self) {
        if let Some(m) = &self.0 {
            m.cancelled.inc();
        }
    }

    pub(crate) fn submit_failed(&self) {
        if let Some(m) = &self.0 {
            m.submit_failures.inc();
        }
    }
}

/// Lowers the waiting gauge when the waiter leaves, admitted or not.
pub(crate) struct WaitGuard<'a>(&'a Recorder);

impl Drop for WaitGuard<'_> {
    fn drop(&mut self) {
        if let Some(m) = &(self.0).0 {
            m.waiting.dec();
        }
    }
}
