// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Document creation payload.
//!
//! Field names follow the endpoint's JSON format. Nothing here is validated:
//! dates and codes are carried as the caller wrote them, and the gate
//! forwards documents as-is for the collaborator to serialize.

use serde::{Deserialize, Serialize};

/// A document submitted for creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub description: Description,
    pub doc_id: String,
    pub doc_status: String,
    pub doc_type: String,
    #[serde(rename = "importRequest")]
    pub import_request: bool,
    pub owner_inn: String,
    pub participant_inn: String,
    pub producer_inn: String,
    pub production_date: String,
    pub production_type: String,
    #[serde(default)]
    pub products: Vec<Product>,
    pub reg_date: String,
    pub reg_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    #[serde(rename = "participantInn")]
    pub participant_inn: String,
}

/// One product line of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub certificate_document: String,
    pub certificate_document_date: String,
    pub certificate_document_number: String,
    pub owner_inn: String,
    pub producer_inn: String,
    pub production_date: String,
    pub tnved_code: String,
    pub uit_code: String,
    pub uitu_code: String,
}

impl Document {
    /// Placeholder document used by the demo binary and tests.
    pub fn sample() -> Self {
        let date = "2020-01-23";

        Self {
            description: Description {
                participant_inn: "participantInn".to_string(),
            },
            doc_id: "docId".to_string(),
            doc_status: "docStatus".to_string(),
            doc_type: "LP_INTRODUCE_GOODS".to_string(),
            import_request: true,
            owner_inn: "ownerInn".to_string(),
            participant_inn: "participantInn".to_string(),
            producer_inn: "producerInn".to_string(),
            production_date: date.to_string(),
            production_type: "productionType".to_string(),
            products: vec![Product {
                certificate_document: "certificateDocument".to_string(),
                certificate_document_date: date.to_string(),
                certificate_document_number: "certificateDocumentNumber".to_string(),
                owner_inn: "ownerInn".to_string(),
                producer_inn: "producerInn".to_string(),
                production_date: date.to_string(),
                tnved_code: "tnvedCode".to_string(),
                uit_code: "uitCode".to_string(),
                uitu_code: "uituCode".to_string(),
            }],
            reg_date: date.to_string(),
            reg_number: "regNumber".to_string(),
        }
    }
}
