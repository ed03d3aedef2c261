// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Records what reached the collaborator and when.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// A single collaborator invocation.
#[derive(Debug, Clone)]
pub struct Call {
    pub doc_id: String,
    pub at: Instant,
}

/// Shared log of collaborator invocations.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a call happening now.
    pub fn record(&self, doc_id: &str) {
        self.calls.lock().unwrap().push(Call {
            doc_id: doc_id.to_string(),
            at: Instant::now(),
        });
    }

    pub fn len(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn doc_ids(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.doc_id).collect()
    }

    /// Call times in ascending order.
    pub fn times(&self) -> Vec<Instant> {
        let mut times: Vec<_> = self.calls().into_iter().map(|c| c.at).collect();
        times.sort();
        times
    }
}

/// Replay the gate's window rule over `times` and return how many calls
/// landed in each window.
///
/// The first window starts at `first_start`; every later window starts at
/// the first call made at or after the previous window's end.
pub fn window_counts(times: &[Instant], first_start: Instant, window: Duration) -> Vec<usize> {
    let mut counts = vec![0];
    let mut start = first_start;

    for &at in times {
        if at >= start + window {
            start = at;
            counts.push(0);
        }
        if let Some(last) = counts.last_mut() {
            *last += 1;
        }
    }

    counts
}

