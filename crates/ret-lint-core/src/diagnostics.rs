//! Diagnostic extraction and per-document diagnostic storage.
//!
//! [`get_diagnostics`] runs the full analysis and keeps only the findings.
//! [`DiagnosticCollection`] is the host-facing store: one diagnostic list per
//! document URI, replaced wholesale on every analysis pass.

use std::collections::HashMap;

use crate::analysis::analyze_document;
use crate::document::Document;
use crate::types::Diagnostic;

/// Get diagnostics for a document.
///
/// Documents in another language produce no diagnostics.
///
/// # Example
///
/// ```rust
/// use ret_lint_core::{Document, get_diagnostics};
///
/// let doc = Document::new("welcome.ret", "---JSON---\n{\"name\": \"w\", \"variables\": {}}\n---HTML---\n<p>{{user}}</p>");
/// let diagnostics = get_diagnostics(&doc);
/// assert_eq!(diagnostics[0].message, "Undeclared variable: 'user'");
/// ```
pub fn get_diagnostics(doc: &Document) -> Vec<Diagnostic> {
    if !doc.is_ret() {
        tracing::trace!(uri = doc.uri(), language = doc.language_id(), "skipping non-RET document");
        return Vec::new();
    }

    let diagnostics = analyze_document(doc).diagnostics;
    tracing::debug!(uri = doc.uri(), count = diagnostics.len(), "computed diagnostics");
    diagnostics
}

/// Diagnostics keyed by document URI.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    entries: HashMap<String, Vec<Diagnostic>>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the diagnostics for `uri`.
    pub fn set(&mut self, uri: impl Into<String>, diagnostics: Vec<Diagnostic>) {
        self.entries.insert(uri.into(), diagnostics);
    }

    pub fn get(&self, uri: &str) -> Option<&[Diagnostic]> {
        self.entries.get(uri).map(Vec::as_slice)
    }

    /// Remove the diagnostics for `uri`, returning what was stored.
    pub fn delete(&mut self, uri: &str) -> Option<Vec<Diagnostic>> {
        self.entries.remove(uri)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Diagnostic])> {
        self.entries
            .iter()
            .map(|(uri, diagnostics)| (uri.as_str(), diagnostics.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Range;

    #[test]
    fn non_ret_documents_have_no_diagnostics() {
        let doc = Document::new("notes.md", "{{undeclared}}").with_language_id("markdown");
        assert!(get_diagnostics(&doc).is_empty());
    }

    #[test]
    fn ret_documents_are_analyzed() {
        let doc = Document::new("t.ret", "---HTML---\n{{a}}");
        let diagnostics = get_diagnostics(&doc);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].is_error());
    }

    #[test]
    fn collection_replaces_per_uri() {
        let mut collection = DiagnosticCollection::new();
        let first = Diagnostic::error(Range::document_start(), "first");
        let second = Diagnostic::warning(Range::document_start(), "second");

        collection.set("a.ret", vec![first.clone()]);
        collection.set("b.ret", vec![first]);
        collection.set("a.ret", vec![second.clone()]);

        assert_eq!(collection.len(), 2);
        assert_eq!(collection.get("a.ret"), Some(&[second][..]));

        assert!(collection.delete("b.ret").is_some());
        assert!(collection.get("b.ret").is_none());
        assert!(collection.delete("b.ret").is_none());

        collection.clear();
        assert!(collection.is_empty());
    }
}
