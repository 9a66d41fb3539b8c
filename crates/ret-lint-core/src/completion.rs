//! Variable completion inside template expressions.
//!
//! Typing `{{` offers every variable declared in the metadata, in the order
//! the metadata declares them.

use indexmap::IndexSet;

use crate::document::Document;
use crate::metadata::validate_metadata;
use crate::sections::split_sections;
use crate::types::{CompletionCandidate, Position};

/// Text that opens an expression and triggers completion.
pub const EXPRESSION_OPEN: &str = "{{";

/// Variables declared by the document's metadata.
///
/// Malformed or absent metadata declares nothing.
pub fn declared_variables(doc: &Document) -> IndexSet<String> {
    let split = split_sections(doc.content());
    validate_metadata(doc, split.json.as_ref()).declared_variables()
}

/// Completion candidates at `position`, or None when the cursor does not
/// follow `{{` or the document is not a RET document.
pub fn complete_at(doc: &Document, position: Position) -> Option<Vec<CompletionCandidate>> {
    let offset = doc.offset_at(position)?;
    complete_at_offset(doc, offset)
}

/// Completion candidates at a byte offset.
pub fn complete_at_offset(doc: &Document, offset: usize) -> Option<Vec<CompletionCandidate>> {
    if !doc.is_ret() {
        return None;
    }
    let before = doc.content().get(..offset)?;
    if !before.ends_with(EXPRESSION_OPEN) {
        return None;
    }

    let candidates: Vec<_> = declared_variables(doc)
        .into_iter()
        .map(CompletionCandidate::variable)
        .collect();
    tracing::trace!(uri = doc.uri(), count = candidates.len(), "completion candidates");
    Some(candidates)
}
