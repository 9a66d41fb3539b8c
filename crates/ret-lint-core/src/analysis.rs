//! Unified document analysis.
//!
//! `analyze_document()` runs the whole pipeline on one text snapshot:
//!
//! ```text
//! text ─► split_sections ─┬─► validate_metadata ──► declared variables ─┐
//!                         ├─► scan_expressions  ──► used occurrences  ──┼─► reconcile ─► diagnostics
//! text ─► extract_loop_scopes ───────────────────► loop scopes ─────────┘
//! ```
//!
//! Each stage runs behind a panic guard. A stage that panics contributes one
//! internal-error diagnostic and its dependents are skipped; everything else
//! still reports. When the metadata is not valid JSON the reconciliation
//! stage is skipped, so the parse error is the only finding for that pass.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use indexmap::IndexSet;

use crate::codes;
use crate::document::Document;
use crate::expressions::{UsedOccurrence, scan_expressions};
use crate::loops::{LoopScope, extract_loop_scopes};
use crate::metadata::{Metadata, validate_metadata};
use crate::reconcile::{Bindings, reconcile};
use crate::sections::{SectionSplit, split_sections};
use crate::types::{Diagnostic, Range};

/// Everything one analysis pass learned about a document.
#[derive(Debug, Clone)]
pub struct DocumentAnalysis<'a> {
    pub sections: SectionSplit<'a>,
    /// Parsed metadata; None when the JSON section is absent or malformed.
    pub metadata: Option<Metadata>,
    pub declared: IndexSet<String>,
    pub occurrences: Vec<UsedOccurrence>,
    pub loop_scopes: Vec<LoopScope>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Analyze a document, producing the full diagnostic set for this pass.
pub fn analyze_document(doc: &Document) -> DocumentAnalysis<'_> {
    let text = doc.content();
    let mut diagnostics = Vec::new();

    let sections = guarded("split", &mut diagnostics, || split_sections(text))
        .unwrap_or_else(|| split_sections(""));

    let validation = guarded("metadata", &mut diagnostics, || {
        validate_metadata(doc, sections.json.as_ref())
    });
    let malformed = validation.as_ref().is_some_and(|v| v.is_malformed());
    let (metadata, declared) = match validation {
        Some(validation) => {
            let declared = validation.declared_variables();
            diagnostics.extend(validation.diagnostics);
            (validation.metadata, declared)
        }
        None => (None, IndexSet::new()),
    };

    let occurrences =
        guarded("expressions", &mut diagnostics, || scan_expressions(&sections)).unwrap_or_default();
    let loop_scopes =
        guarded("loops", &mut diagnostics, || extract_loop_scopes(text)).unwrap_or_default();

    if !malformed {
        let bindings = Bindings {
            declared: &declared,
            occurrences: &occurrences,
            loop_scopes: &loop_scopes,
        };
        if let Some(found) = guarded("reconcile", &mut diagnostics, || {
            reconcile(doc, sections.json.as_ref(), &bindings)
        }) {
            diagnostics.extend(found);
        }
    }

    tracing::debug!(
        uri = doc.uri(),
        occurrences = occurrences.len(),
        loops = loop_scopes.len(),
        diagnostics = diagnostics.len(),
        "analyzed document"
    );

    DocumentAnalysis {
        sections,
        metadata,
        declared,
        occurrences,
        loop_scopes,
        diagnostics,
    }
}

/// Run one pipeline stage, converting a panic into a diagnostic.
pub(crate) fn guarded<T>(
    stage: &'static str,
    diagnostics: &mut Vec<Diagnostic>,
    run: impl FnOnce() -> T,
) -> Option<T> {
    match panic::catch_unwind(AssertUnwindSafe(run)) {
        Ok(value) => Some(value),
        Err(payload) => {
            let detail = panic_detail(payload.as_ref());
            tracing::error!(stage, detail = %detail, "analysis stage panicked");
            diagnostics.push(
                Diagnostic::error(
                    Range::document_start(),
                    format!("Internal error while analyzing document: {detail}"),
                )
                .with_code(codes::INTERNAL_ERROR),
            );
            None
        }
    }
}

fn panic_detail(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
