// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Rolling window accounting shared by the async and blocking gates.
//!
//! A window starts at the instant of the call that opened it and lasts a
//! fixed duration. Admissions are counted per window; the count drops to
//! zero the first time a caller observes that the window has elapsed, and
//! the new window starts at that caller's `now`.
//!
//! `Window` holds no lock and reads no clock. The gates own one behind
//! their mutex and pass `now` in, which keeps the reset-then-admit rule in
//! one place and testable with plain instants.

use std::time::{Duration, Instant};

/// Decision for a single admission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// A slot was taken in the current window.
    Admitted {
        /// This call opened a new window before being admitted
        rolled_over: bool,
        /// Slots left in the current window after this admission
        remaining: u32,
    },
    /// Every slot is taken; retry once the window has rolled over.
    Full {
        /// When the current window ends. `None` if the end is not
        /// representable as an `Instant`.
        resets_at: Option<Instant>,
    },
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted { .. })
    }
}

/// The current accounting period.
#[derive(Debug, Clone)]
pub struct Window {
    start: Instant,
    duration: Duration,
    count: u32,
}

impl Window {
    pub fn new(start: Instant, duration: Duration) -> Self {
        Self {
            start,
            duration,
            count: 0,
        }
    }

    /// Try to take a slot at `now`, resetting the window first if it has
    /// elapsed.
    pub fn try_admit(&mut self, now: Instant, limit: u32) -> Admission {
        let rolled_over = self.roll_over(now);

        if self.count < limit {
            self.count += 1;
            Admission::Admitted {
                rolled_over,
                remaining: limit - self.count,
            }
        } else {
            Admission::Full {
                resets_at: self.resets_at(),
            }
        }
    }

    /// Reset the window if `now` is at or past its end. Returns whether a
    /// reset happened.
    pub fn roll_over(&mut self, now: Instant) -> bool {
        match self.resets_at() {
            Some(end) if now >= end => {
                self.start = now;
                self.count = 0;
                true
            }
            _ => false,
        }
    }

    pub fn start(&self) -> Instant {
        self.start
    }

    /// Admissions granted since the window started.
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn resets_at(&self) -> Option<Instant> {
        self.start.checked_add(self.duration)
    }
}

/// Point-in-time view of a gate's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSnapshot {
    pub limit: u32,
    pub count: u32,
    pub remaining: u32,
    pub window_start: Instant,
    pub resets_at: Option<Instant>,
}

impl WindowSnapshot {
    pub(crate) fn capture(window: &Window, limit: u32) -> Self {
        Self {
            limit,
            count: window.count(),
            remaining: limit.saturating_sub(window.count()),
            window_start: window.start(),
            resets_at: window.resets_at(),
        }
    }
}
