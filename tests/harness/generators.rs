// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Payload generators for test scenarios.

use submission_gate::document::{Document, Product};

/// Generate `count` documents with distinct ids (`doc-0`, `doc-1`, ...).
pub fn generate_documents(count: usize) -> Vec<Document> {
    (0..count).map(generate_document).collect()
}

/// One document with id `doc-{n}`.
pub fn generate_document(n: usize) -> Document {
    let mut doc = Document::sample();
    doc.doc_id = format!("doc-{n}");
    doc.reg_number = format!("reg-{n}");
    doc.products = generate_products(n % 3 + 1);
    doc
}

/// Generate `count` product lines with distinct identification codes.
pub fn generate_products(count: usize) -> Vec<Product> {
    let template = Document::sample().products.remove(0);
    (0..count)
        .map(|i| Product {
            uit_code: format!("uit-{i:04}"),
            uitu_code: format!("uitu-{i:04}"),
            ..template.clone()
        })
        .collect()
}
