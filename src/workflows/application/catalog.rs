use std::fmt::Write as _;

use tracing::warn;

use super::drive::{DocumentStore, DocumentSummary};
use crate::config::DocumentConfig;

/// Outcome of looking up one configured reference document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceCheck {
    Found {
        label: &'static str,
        summary: DocumentSummary,
    },
    Inaccessible {
        label: &'static str,
        reason: String,
    },
}

/// Listing mode: what the assistant can see in the document store.
#[derive(Debug)]
pub struct DocumentCatalog<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> DocumentCatalog<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Looks up each configured reference id. Unconfigured ids are skipped.
    pub fn check_references(&self, documents: &DocumentConfig) -> Vec<ReferenceCheck> {
        [
            ("Resume", documents.resume_id.as_deref()),
            ("Cover letter", documents.cover_letter_id.as_deref()),
        ]
        .into_iter()
        .filter_map(|(label, id)| id.map(|id| (label, id)))
        .map(|(label, id)| match self.store.document_metadata(id) {
            Ok(summary) => ReferenceCheck::Found { label, summary },
            Err(err) => ReferenceCheck::Inaccessible {
                label,
                reason: err.to_string(),
            },
        })
        .collect()
    }

    /// Lists accessible documents; a backend failure is reported and yields
    /// an empty listing.
    pub fn list(&self) -> Vec<DocumentSummary> {
        match self.store.list_documents() {
            Ok(entries) => entries,
            Err(err) => {
                warn!(error = %err, "listing documents failed");
                println!("An error occurred: {err}");
                Vec::new()
            }
        }
    }
}

pub fn render_reference_checks(checks: &[ReferenceCheck]) -> String {
    let mut out = String::from("\nChecking specific files:\n");
    for check in checks {
        let _ = match check {
            ReferenceCheck::Found { label, summary } => {
                writeln!(out, "{label} found: {} ({})", summary.name, summary.id)
            }
            ReferenceCheck::Inaccessible { label, reason } => {
                writeln!(out, "Could not access {}: {reason}", label.to_lowercase())
            }
        };
    }
    out
}

pub fn render_listing(entries: &[DocumentSummary]) -> String {
    let mut out = String::from("\nListing all accessible documents:\n");
    if entries.is_empty() {
        out.push_str("No files found.\n");
        return out;
    }

    for entry in entries {
        let _ = writeln!(out, "Name: {}", entry.name);
        let _ = writeln!(out, "ID: {}", entry.id);
        let _ = writeln!(out, "Type: {}", entry.content_type);
        if let Some(owner) = &entry.owner_email {
            let _ = writeln!(out, "Owner: {owner}");
        }
        out.push_str("---\n");
    }
    out
}
