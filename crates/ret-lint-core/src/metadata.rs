//! Metadata validation for the JSON section.
//!
//! The JSON section declares the template's name and the variables the HTML
//! and TEXT bodies may reference. JSON parsing discards source positions, so
//! every key-level diagnostic is located by searching the raw section text
//! for `"key"` followed by optional whitespace and a colon. The diagnostic
//! range covers the key name without its quotes.

use indexmap::IndexSet;
use ret_source_map::Span;
use serde_json::{Map, Value};

use crate::codes;
use crate::document::Document;
use crate::sections::Section;
use crate::types::{Diagnostic, Range};

/// Top-level properties the metadata object may carry.
pub const ALLOWED_PROPERTIES: [&str; 8] = [
    "name",
    "description",
    "keywords",
    "allowed",
    "locale",
    "variables",
    "theme",
    "license",
];

/// Parsed metadata object.
///
/// A JSON root that is not an object parses to metadata without properties.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Metadata {
    properties: Map<String, Value>,
}

impl Metadata {
    /// Parse metadata from the JSON section text.
    pub fn parse(source: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(source)?;
        Ok(Self::from_value(value))
    }

    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(properties) => Self { properties },
            _ => Self::default(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Top-level keys in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// The template name, if it is a non-empty string.
    pub fn name(&self) -> Option<&str> {
        self.get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
    }

    pub fn variables(&self) -> Option<&Map<String, Value>> {
        self.get("variables").and_then(Value::as_object)
    }

    pub fn theme(&self) -> Option<&Map<String, Value>> {
        self.get("theme").and_then(Value::as_object)
    }

    /// Top-level keys outside [`ALLOWED_PROPERTIES`].
    pub fn unknown_properties(&self) -> impl Iterator<Item = &str> {
        self.keys().filter(|key| !ALLOWED_PROPERTIES.contains(key))
    }

    /// Names declared under `variables` and `theme`, deduplicated, in
    /// declaration order.
    pub fn declared_variables(&self) -> IndexSet<String> {
        self.variables()
            .into_iter()
            .chain(self.theme())
            .flat_map(|pool| pool.keys().cloned())
            .collect()
    }
}

/// Outcome of validating the JSON section.
#[derive(Debug, Clone, Default)]
pub struct MetadataValidation {
    /// The parsed metadata; None when the section is absent or malformed.
    pub metadata: Option<Metadata>,
    pub diagnostics: Vec<Diagnostic>,
    malformed: bool,
}

impl MetadataValidation {
    /// Whether the section was present but failed to parse as JSON.
    pub fn is_malformed(&self) -> bool {
        self.malformed
    }

    pub fn declared_variables(&self) -> IndexSet<String> {
        self.metadata
            .as_ref()
            .map(Metadata::declared_variables)
            .unwrap_or_default()
    }
}

/// Find the key name of the first `"key"\s*:` in `source`.
///
/// The returned span is relative to `source` and excludes the quotes. Keys
/// whose raw text differs from `key` (escape sequences) are not found.
pub fn find_property_key(source: &str, key: &str) -> Option<Span> {
    let needle = format!("\"{key}\"");
    let mut from = 0;
    while let Some(found) = source[from..].find(&needle) {
        let quote = from + found;
        let rest = &source[quote + needle.len()..];
        if rest.trim_start().starts_with(':') {
            return Some(Span::at(quote + 1, key.len()));
        }
        from = quote + 1;
    }
    None
}

/// Maps section-relative findings to document ranges.
struct Locator<'d, 's> {
    doc: &'d Document,
    section: &'s Section<'s>,
}

impl Locator<'_, '_> {
    fn key(&self, key: &str) -> Option<Range> {
        find_property_key(self.section.content, key)
            .map(|span| self.doc.range_of(span.offset_by(self.section.start_offset)))
    }

    fn slice(&self) -> Range {
        self.doc.range_of(self.section.span())
    }

    fn key_or_slice(&self, key: &str) -> Range {
        self.key(key).unwrap_or_else(|| self.slice())
    }
}

/// Validate the JSON section of `doc`.
///
/// An absent section produces no diagnostics. A section that fails to parse
/// produces exactly one error spanning the section and nothing else.
pub fn validate_metadata(doc: &Document, section: Option<&Section<'_>>) -> MetadataValidation {
    let Some(section) = section else {
        return MetadataValidation::default();
    };
    let locate = Locator { doc, section };

    let metadata = match Metadata::parse(section.content) {
        Ok(metadata) => metadata,
        Err(err) => {
            tracing::debug!(uri = doc.uri(), error = %err, "metadata is not valid JSON");
            let diagnostic = Diagnostic::error(
                locate.slice(),
                format!("JSON parsing error: {err}. Please ensure your JSON is valid."),
            )
            .with_code(codes::JSON_SYNTAX);
            return MetadataValidation {
                metadata: None,
                diagnostics: vec![diagnostic],
                malformed: true,
            };
        }
    };

    let mut diagnostics = Vec::new();

    for key in metadata.unknown_properties() {
        // Keys we cannot find textually are skipped rather than misplaced.
        if let Some(range) = locate.key(key) {
            diagnostics.push(
                Diagnostic::warning(range, format!("Unknown JSON property: '{key}'"))
                    .with_code(codes::UNKNOWN_PROPERTY),
            );
        }
    }

    if metadata.name().is_none() {
        diagnostics.push(
            Diagnostic::error(
                locate.key_or_slice("name"),
                "Missing or invalid 'name' property. 'name' must be a non-empty string.",
            )
            .with_code(codes::INVALID_NAME),
        );
    }

    match metadata.get("variables") {
        None => diagnostics.push(
            Diagnostic::error(locate.slice(), "Mandatory property 'variables' is missing.")
                .with_code(codes::MISSING_VARIABLES),
        ),
        Some(Value::Object(_)) => {}
        Some(_) => diagnostics.push(
            Diagnostic::error(
                locate.key_or_slice("variables"),
                "'variables' property must be an object.",
            )
            .with_code(codes::INVALID_VARIABLES),
        ),
    }

    if metadata.get("theme").is_some_and(|theme| !theme.is_object()) {
        diagnostics.push(
            Diagnostic::error(locate.key_or_slice("theme"), "'theme' property must be an object.")
                .with_code(codes::INVALID_THEME),
        );
    }

    MetadataValidation {
        metadata: Some(metadata),
        diagnostics,
        malformed: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::split_sections;
    use crate::types::{DiagnosticSeverity, Position};

    fn document(json: &str) -> Document {
        Document::new("test.ret", format!("---JSON---\n{json}\n---HTML---\n<p></p>\n"))
    }

    fn validate(doc: &Document) -> MetadataValidation {
        let split = split_sections(doc.content());
        validate_metadata(doc, split.json.as_ref())
    }

    fn codes_of(validation: &MetadataValidation) -> Vec<&str> {
        validation
            .diagnostics
            .iter()
            .filter_map(|d| d.code.as_deref())
            .collect()
    }

    #[test]
    fn valid_metadata_has_no_diagnostics() {
        let doc = document(r##"{"name": "welcome", "variables": {"user": ""}, "theme": {"color": "#fff"}}"##);
        let validation = validate(&doc);
        assert!(validation.diagnostics.is_empty(), "{:?}", validation.diagnostics);
        assert!(!validation.is_malformed());

        let declared: Vec<_> = validation.declared_variables().into_iter().collect();
        assert_eq!(declared, vec!["user", "color"]);
    }

    #[test]
    fn absent_section_is_not_an_error() {
        let doc = Document::new("test.ret", "<p>no sections</p>");
        let validation = validate_metadata(&doc, None);
        assert!(validation.diagnostics.is_empty());
        assert!(validation.metadata.is_none());
        assert!(!validation.is_malformed());
    }

    #[test]
    fn malformed_json_is_one_error_over_the_slice() {
        let doc = document("{\"name\": \"x\", \"variables\": {},}");
        let validation = validate(&doc);

        assert!(validation.is_malformed());
        assert_eq!(validation.diagnostics.len(), 1);
        let diag = &validation.diagnostics[0];
        assert_eq!(diag.severity, DiagnosticSeverity::Error);
        assert!(diag.message.starts_with("JSON parsing error: trailing comma"));
        assert!(diag.message.ends_with("Please ensure your JSON is valid."));
        // Slice runs from after the marker line to the HTML marker.
        assert_eq!(diag.range.start, Position::new(1, 0));
        assert_eq!(diag.range.end, Position::new(2, 0));
    }

    #[test]
    fn unknown_property_warns_at_key() {
        let doc = document(r#"{"name": "x", "variables": {}, "foo": 1}"#);
        let validation = validate(&doc);

        assert_eq!(codes_of(&validation), vec![codes::UNKNOWN_PROPERTY]);
        let diag = &validation.diagnostics[0];
        assert_eq!(diag.message, "Unknown JSON property: 'foo'");
        assert_eq!(diag.severity, DiagnosticSeverity::Warning);
        let column = r#"{"name": "x", "variables": {}, ""#.len() as u32;
        assert_eq!(diag.range.start, Position::new(1, column));
        assert_eq!(diag.range.end, Position::new(1, column + 3));
    }

    #[test]
    fn unknown_property_uses_first_textual_occurrence() {
        // The nested "foo" comes first in the text and wins.
        let doc = document(r#"{"name": "x", "variables": {"foo": 1}, "foo": 2}"#);
        let validation = validate(&doc);
        let diag = &validation.diagnostics[0];
        let column = r#"{"name": "x", "variables": {""#.len() as u32;
        assert_eq!(diag.range.start, Position::new(1, column));
    }

    #[test]
    fn unlocatable_unknown_property_is_skipped() {
        // The key is written with an escape, so its raw text never matches.
        let doc = document(r#"{"name": "x", "variables": {}, "f\u006fo": 1}"#);
        let validation = validate(&doc);
        assert!(validation.diagnostics.is_empty());
    }

    #[test]
    fn empty_name_is_reported_at_key() {
        let doc = document(r#"{"name": "", "variables": {}}"#);
        let validation = validate(&doc);
        assert_eq!(codes_of(&validation), vec![codes::INVALID_NAME]);
        let range = validation.diagnostics[0].range;
        assert_eq!(range.start, Position::new(1, 2));
        assert_eq!(range.end, Position::new(1, 6));
    }

    #[test]
    fn missing_name_falls_back_to_slice() {
        let doc = document(r#"{"variables": {}}"#);
        let validation = validate(&doc);
        assert_eq!(codes_of(&validation), vec![codes::INVALID_NAME]);
        assert_eq!(validation.diagnostics[0].range.start, Position::new(1, 0));
        assert_eq!(validation.diagnostics[0].range.end, Position::new(2, 0));
    }

    #[test]
    fn non_string_name_is_invalid() {
        let doc = document(r#"{"name": 42, "variables": {}}"#);
        assert_eq!(codes_of(&validate(&doc)), vec![codes::INVALID_NAME]);
    }

    #[test]
    fn missing_variables_spans_slice() {
        let doc = document(r#"{"name": "x"}"#);
        let validation = validate(&doc);
        assert_eq!(codes_of(&validation), vec![codes::MISSING_VARIABLES]);
        assert_eq!(
            validation.diagnostics[0].message,
            "Mandatory property 'variables' is missing."
        );
    }

    #[test]
    fn variables_must_be_an_object() {
        for value in ["null", "[]", "\"a\"", "3"] {
            let doc = document(&format!(r#"{{"name": "x", "variables": {value}}}"#));
            let validation = validate(&doc);
            assert_eq!(codes_of(&validation), vec![codes::INVALID_VARIABLES], "{value}");
            let range = validation.diagnostics[0].range;
            assert_eq!(range.start, Position::new(1, 15));
            assert_eq!(range.end, Position::new(1, 24));
        }
    }

    #[test]
    fn theme_must_be_an_object_when_present() {
        let doc = document(r#"{"name": "x", "variables": {}, "theme": ["dark"]}"#);
        let validation = validate(&doc);
        assert_eq!(codes_of(&validation), vec![codes::INVALID_THEME]);
        assert_eq!(
            validation.diagnostics[0].message,
            "'theme' property must be an object."
        );
    }

    #[test]
    fn non_object_root_reports_missing_properties() {
        let doc = document("[1, 2]");
        let validation = validate(&doc);
        assert_eq!(
            codes_of(&validation),
            vec![codes::INVALID_NAME, codes::MISSING_VARIABLES]
        );
    }

    #[test]
    fn declared_variables_are_deduplicated() {
        let metadata =
            Metadata::parse(r#"{"variables": {"a": 1, "b": 2}, "theme": {"b": 3, "c": 4}}"#).unwrap();
        let declared: Vec<_> = metadata.declared_variables().into_iter().collect();
        assert_eq!(declared, vec!["a", "b", "c"]);
    }

    #[test]
    fn find_property_key_requires_colon() {
        let source = r#"{"title": "name", "name": "x"}"#;
        let span = find_property_key(source, "name").unwrap();
        assert_eq!(span.slice(source), Some("name"));
        assert_eq!(span.start, 19);
        assert_eq!(find_property_key(source, "missing"), None);
    }
}
