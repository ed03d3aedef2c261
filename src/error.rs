// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for the submission gate.

use thiserror::Error;

/// A gate could not be built from the supplied parameters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid configuration for {field}: {reason}")]
pub struct InvalidConfiguration {
    pub field: &'static str,
    pub reason: String,
}

impl InvalidConfiguration {
    pub(crate) fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Outcome of a cancellable submission that did not produce a collaborator result.
#[derive(Debug, Error)]
pub enum SubmitError<E> {
    /// The caller gave up waiting before it was admitted.
    #[error("Submission cancelled while waiting for admission")]
    Cancelled,

    /// The collaborator ran and failed; the error is passed through untouched.
    #[error(transparent)]
    Submission(E),
}

impl<E> SubmitError<E> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SubmitError::Cancelled)
    }

    /// Unwrap the collaborator error, if there is one.
    pub fn into_submission(self) -> Option<E> {
        match self {
            SubmitError::Cancelled => None,
            SubmitError::Submission(e) => Some(e),
        }
    }
}

/// Failures raised by the HTTP collaborators.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Couldn't serialize payload to JSON: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Endpoint answered {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Invalid header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },
}

/// Configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {reason}")]
    Env { var: &'static str, reason: String },

    #[error(transparent)]
    Invalid(#[from] InvalidConfiguration),
}
