// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Load patterns driven against a shared gate.

use super::generators;
use std::sync::Arc;
use std::time::Duration;
use submission_gate::document::Document;
use submission_gate::{RateLimitedGate, Submitter};
use tokio::task::JoinSet;
use tokio::time::{self, Instant};

/// How callers arrive at the gate.
#[derive(Debug, Clone)]
pub struct LoadPattern {
    /// Number of callers
    pub callers: usize,
    /// Delay between consecutive arrivals
    pub stagger: Duration,
    /// Give up after waiting this long for admission
    pub timeout: Option<Duration>,
}

impl Default for LoadPattern {
    fn default() -> Self {
        Self {
            callers: 10,
            stagger: Duration::ZERO,
            timeout: None,
        }
    }
}

/// Predefined patterns.
impl LoadPattern {
    /// Everybody arrives at once.
    pub fn burst(callers: usize) -> Self {
        Self {
            callers,
            ..Default::default()
        }
    }

    /// One caller every `gap`.
    pub fn staggered(callers: usize, gap: Duration) -> Self {
        Self {
            callers,
            stagger: gap,
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Outcome counts of a load run.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub admitted: usize,
    pub cancelled: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

impl LoadReport {
    pub fn total(&self) -> usize {
        self.admitted + self.cancelled + self.failed
    }
}

enum Outcome {
    Admitted,
    Cancelled,
    Failed,
}

/// Drive `pattern` against `gate` with generated documents and wait for
/// every caller to finish.
pub async fn run_load<S>(gate: Arc<RateLimitedGate<S>>, pattern: &LoadPattern) -> LoadReport
where
    S: Submitter<Document> + 'static,
{
    let started = Instant::now();
    let mut tasks = JoinSet::new();

    for (i, doc) in generators::generate_documents(pattern.callers)
        .into_iter()
        .enumerate()
    {
        if i > 0 && !pattern.stagger.is_zero() {
            time::sleep(pattern.stagger).await;
        }

        let gate = gate.clone();
        let timeout = pattern.timeout;
        tasks.spawn(async move {
            match timeout {
                Some(timeout) => match gate.submit_timeout(doc, timeout).await {
                    Ok(_) => Outcome::Admitted,
                    Err(e) if e.is_cancelled() => Outcome::Cancelled,
                    Err(_) => Outcome::Failed,
                },
                None => match gate.submit(doc).await {
                    Ok(_) => Outcome::Admitted,
                    Err(_) => Outcome::Failed,
                },
            }
        });
    }

    let mut report = LoadReport::default();
    while let Some(joined) = tasks.join_next().await {
        match joined.expect("caller task panicked") {
            Outcome::Admitted => report.admitted += 1,
            Outcome::Cancelled => report.cancelled += 1,
            Outcome::Failed => report.failed += 1,
        }
    }
    report.elapsed = started.elapsed();
    report
}
