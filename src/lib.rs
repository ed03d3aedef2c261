// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Submission Gate
//!
//! Client-side admission control for outbound document submissions:
//!
//! - At most `limit` submissions start per rolling window
//! - Callers beyond the limit wait until the window rolls over
//! - Waiting callers can give up (timeout or any cancellation future)
//! - Collaborator results and errors are returned untouched
//! - Async (`RateLimitedGate`) and thread-blocking (`BlockingGate`) variants
//!
//! The HTTP collaborators in [`transport`] send [`document::Document`]
//! payloads as JSON; any other [`Submitter`] works the same way.
//!
//! ```no_run
//! use std::time::Duration;
//! use submission_gate::{config::EndpointConfig, transport::HttpSubmitter, RateLimitedGate};
//! use submission_gate::document::Document;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let submitter = HttpSubmitter::new(EndpointConfig::default());
//! let gate = RateLimitedGate::new(10, Duration::from_secs(60), submitter)?;
//! let body = gate.submit(Document::sample()).await?;
//! println!("{body}");
//! # Ok(())
//! # }
//! ```

pub mod blocking;
pub mod config;
pub mod document;
pub mod error;
pub mod gate;
pub mod metrics;
pub mod submitter;
pub mod transport;
pub mod window;

pub use blocking::BlockingGate;
pub use config::{Config, GateConfig, WindowUnit};
pub use error::{InvalidConfiguration, SubmitError, TransportError};
pub use gate::RateLimitedGate;
pub use metrics::GateMetrics;
pub use submitter::{BlockingSubmitter, Submitter};
pub use window::WindowSnapshot;
