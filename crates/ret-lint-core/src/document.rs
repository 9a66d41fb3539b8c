//! Document abstraction for template analysis.
//!
//! A [`Document`] is the host's text buffer as the core sees it: an immutable
//! snapshot of the content plus the offset ↔ position mapping. Analysis
//! passes never mutate it; the host replaces the content between passes.

use std::collections::HashMap;

use ret_source_map::{FileInformation, Span};

use crate::types::{Position, Range};

/// Language identifier the linter activates on.
pub const RET_LANGUAGE_ID: &str = "ret";

/// A document for template analysis.
#[derive(Debug, Clone)]
pub struct Document {
    /// The document's URI or path.
    uri: String,
    /// The host's language identifier for this document.
    language_id: String,
    /// The document content.
    content: String,
    /// Version number for tracking changes (optional, used by LSP).
    version: Option<i32>,
    /// Line index over `content`.
    info: FileInformation,
}

impl Document {
    /// Create a new RET document with the given URI and content.
    pub fn new(uri: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            uri: uri.into(),
            language_id: RET_LANGUAGE_ID.to_string(),
            info: FileInformation::new(&content),
            content,
            version: None,
        }
    }

    /// Create a new document with a version number.
    pub fn with_version(uri: impl Into<String>, content: impl Into<String>, version: i32) -> Self {
        let mut doc = Self::new(uri, content);
        doc.version = Some(version);
        doc
    }

    /// Override the language identifier reported by the host.
    pub fn with_language_id(mut self, language_id: impl Into<String>) -> Self {
        self.language_id = language_id.into();
        self
    }

    /// Get the document's URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Get the document's content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Get the document's version, if set.
    pub fn version(&self) -> Option<i32> {
        self.version
    }

    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    /// Whether the linter should run on this document.
    pub fn is_ret(&self) -> bool {
        self.language_id == RET_LANGUAGE_ID
    }

    /// Get the filename from the URI (for display purposes).
    pub fn filename(&self) -> &str {
        self.uri.rsplit(['/', '\\']).next().unwrap_or(&self.uri)
    }

    /// Update the document content.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.info = FileInformation::new(&self.content);
    }

    /// Update the document content with a new version.
    pub fn set_content_with_version(&mut self, content: impl Into<String>, version: i32) {
        self.set_content(content);
        self.version = Some(version);
    }

    /// Convert a byte offset into a position. Offsets past the end clamp to the end.
    pub fn position_at(&self, offset: usize) -> Position {
        self.info
            .offset_to_location(offset.min(self.content.len()))
            .map(|loc| Position::new(loc.row as u32, loc.column as u32))
            .unwrap_or_default()
    }

    /// Convert a position into a byte offset, or None if the line does not exist.
    pub fn offset_at(&self, position: Position) -> Option<usize> {
        self.info
            .location_to_offset(position.line as usize, position.character as usize)
    }

    /// Convert a byte span into a range.
    pub fn range_of(&self, span: Span) -> Range {
        Range::new(self.position_at(span.start), self.position_at(span.end))
    }

    /// Text of a line without its line terminator.
    pub fn line_text(&self, line: u32) -> Option<&str> {
        let line = line as usize;
        if line >= self.info.line_count() {
            return None;
        }
        let start = self.info.line_start(line);
        let end = self.info.line_start(line + 1);
        let text = &self.content[start..end];
        Some(text.trim_end_matches('\n').trim_end_matches('\r'))
    }
}

/// A document store for managing open documents, keyed by URI.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: HashMap<String, Document>,
}

impl DocumentStore {
    /// Create a new empty document store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open or update a document in the store.
    pub fn open(
        &mut self,
        uri: impl Into<String>,
        language_id: impl Into<String>,
        content: impl Into<String>,
        version: i32,
    ) {
        let uri = uri.into();
        let doc = Document::with_version(uri.clone(), content, version).with_language_id(language_id);
        self.documents.insert(uri, doc);
    }

    /// Update a document's content.
    pub fn change(&mut self, uri: &str, content: impl Into<String>, version: i32) {
        if let Some(doc) = self.documents.get_mut(uri) {
            doc.set_content_with_version(content, version);
        }
    }

    /// Close a document (remove from store).
    pub fn close(&mut self, uri: &str) -> Option<Document> {
        self.documents.remove(uri)
    }

    /// Get a document by URI.
    pub fn get(&self, uri: &str) -> Option<&Document> {
        self.documents.get(uri)
    }

    /// Iterate over all open documents.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    /// Check if a document is in the store.
    pub fn contains(&self, uri: &str) -> bool {
        self.documents.contains_key(uri)
    }

    /// Get the number of documents in the store.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_creation() {
        let doc = Document::new("file:///welcome.ret", "---JSON---\n{}");
        assert_eq!(doc.uri(), "file:///welcome.ret");
        assert_eq!(doc.filename(), "welcome.ret");
        assert_eq!(doc.version(), None);
        assert!(doc.is_ret());
    }

    #[test]
    fn language_id_gates_linting() {
        let doc = Document::new("notes.txt", "hello").with_language_id("plaintext");
        assert!(!doc.is_ret());
    }

    #[test]
    fn document_update_rebuilds_line_index() {
        let mut doc = Document::with_version("a.ret", "one line", 1);
        doc.set_content_with_version("first\nsecond", 2);
        assert_eq!(doc.version(), Some(2));
        assert_eq!(doc.position_at(6), Position::new(1, 0));
    }

    #[test]
    fn position_offset_conversion() {
        let doc = Document::new("a.ret", "ab\r\ncd\n");
        assert_eq!(doc.position_at(4), Position::new(1, 0));
        assert_eq!(doc.offset_at(Position::new(1, 1)), Some(5));
        assert_eq!(doc.offset_at(Position::new(9, 0)), None);
        // Past the end clamps
        assert_eq!(doc.position_at(100), Position::new(2, 0));
    }

    #[test]
    fn line_text_strips_terminators() {
        let doc = Document::new("a.ret", "ab\r\ncd\nlast");
        assert_eq!(doc.line_text(0), Some("ab"));
        assert_eq!(doc.line_text(1), Some("cd"));
        assert_eq!(doc.line_text(2), Some("last"));
        assert_eq!(doc.line_text(3), None);
    }

    #[test]
    fn document_store_lifecycle() {
        let mut store = DocumentStore::new();

        store.open("file:///a.ret", "ret", "content a", 1);
        store.open("file:///b.ret", "ret", "content b", 1);
        assert_eq!(store.len(), 2);

        store.change("file:///a.ret", "updated a", 2);
        let a = store.get("file:///a.ret").unwrap();
        assert_eq!(a.content(), "updated a");
        assert_eq!(a.version(), Some(2));
        assert_eq!(a.language_id(), "ret");

        assert!(store.close("file:///a.ret").is_some());
        assert_eq!(store.len(), 1);
        assert!(!store.contains("file:///a.ret"));
        assert!(store.contains("file:///b.ret"));
    }
}
