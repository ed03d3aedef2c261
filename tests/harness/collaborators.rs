// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Collaborators that record every call into a [`CallLog`].

use super::metrics::CallLog;
use std::time::Duration;
use submission_gate::document::Document;
use submission_gate::submitter::{from_blocking_fn, from_fn};
use submission_gate::{BlockingSubmitter, Submitter};
use thiserror::Error;

/// Error returned by [`rejecting`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("document {doc_id} rejected: {reason}")]
pub struct Rejected {
    pub doc_id: String,
    pub reason: String,
}

fn created(doc: &Document) -> String {
    format!("created {}", doc.doc_id)
}

/// Accepts every document and answers `created <doc_id>`.
pub fn recording(log: CallLog) -> impl Submitter<Document, Output = String, Error = Rejected> {
    from_fn(move |doc: Document| {
        let log = log.clone();
        async move {
            log.record(&doc.doc_id);
            Ok::<_, Rejected>(created(&doc))
        }
    })
}

/// Rejects every document with `reason`.
pub fn rejecting(
    log: CallLog,
    reason: &'static str,
) -> impl Submitter<Document, Output = String, Error = Rejected> {
    from_fn(move |doc: Document| {
        let log = log.clone();
        async move {
            log.record(&doc.doc_id);
            Err::<String, _>(Rejected {
                doc_id: doc.doc_id,
                reason: reason.to_string(),
            })
        }
    })
}

/// Records the call on entry, then takes `delay` to answer.
pub fn slow(
    log: CallLog,
    delay: Duration,
) -> impl Submitter<Document, Output = String, Error = Rejected> {
    from_fn(move |doc: Document| {
        let log = log.clone();
        async move {
            log.record(&doc.doc_id);
            tokio::time::sleep(delay).await;
            Ok::<_, Rejected>(created(&doc))
        }
    })
}

/// Thread-blocking twin of [`recording`].
pub fn blocking_recording(
    log: CallLog,
) -> impl BlockingSubmitter<Document, Output = String, Error = Rejected> {
    from_blocking_fn(move |doc: Document| {
        log.record(&doc.doc_id);
        Ok::<_, Rejected>(created(&doc))
    })
}
