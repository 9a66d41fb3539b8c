//! Template expression scanning for the HTML and TEXT sections.
//!
//! Every `{{...}}` expression that references a variable becomes a
//! [`UsedOccurrence`]:
//!
//! | Expression              | Kind          | Name reported  |
//! |-------------------------|---------------|----------------|
//! | `{{#if name}}`          | `IfCondition` | `name`         |
//! | `{{#for it in items}}`  | `LoopArray`   | `items`        |
//! | `{{ name }}`            | `Plain`       | trimmed inner  |
//!
//! Closers (`{{/for}}`, `{{/if}}`) and other `#` forms are not occurrences.
//! Loop iterators are handled by [`crate::loops`].

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use ret_source_map::Span;
use serde::{Deserialize, Serialize};

use crate::sections::{Section, SectionSplit};

static EXPRESSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\{\{(?:",
        r"#if\s+([a-zA-Z_][a-zA-Z0-9_]*)",
        r"|#for\s+([a-zA-Z_][a-zA-Z0-9_]*)\s+in\s+([a-zA-Z_][a-zA-Z0-9_]*)",
        r"|([^#/][^}]*?)",
        r")\}\}",
    ))
    .expect("valid expression pattern")
});

const IF_NAME: usize = 1;
const FOR_COLLECTION: usize = 3;
const PLAIN_BODY: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccurrenceKind {
    /// `{{name}}`
    Plain,
    /// `{{#if name}}`
    IfCondition,
    /// The collection of `{{#for it in name}}`
    LoopArray,
    /// A use of a loop iterator. Never produced by the scanner; iterator
    /// uses appear as `Plain` and are resolved against loop scopes.
    LoopIterator,
}

/// A variable reference inside a `{{...}}` expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UsedOccurrence {
    pub name: String,
    /// Absolute span of the name.
    pub span: Span,
    pub kind: OccurrenceKind,
}

/// Scan the HTML and TEXT sections, in that order.
pub fn scan_expressions(split: &SectionSplit<'_>) -> Vec<UsedOccurrence> {
    split.body_sections().flat_map(scan_section).collect()
}

/// Scan one section for variable occurrences.
pub fn scan_section(section: &Section<'_>) -> Vec<UsedOccurrence> {
    EXPRESSION
        .captures_iter(section.content)
        .filter_map(|caps| classify(&caps))
        .map(|(name, span, kind)| UsedOccurrence {
            name: name.to_string(),
            span: span.offset_by(section.start_offset),
            kind,
        })
        .collect()
}

/// Classify one expression match, returning the name with its
/// section-relative span.
fn classify<'t>(caps: &Captures<'t>) -> Option<(&'t str, Span, OccurrenceKind)> {
    let (name, start, kind) = if let Some(m) = caps.get(IF_NAME) {
        (m.as_str(), m.start(), OccurrenceKind::IfCondition)
    } else if let Some(m) = caps.get(FOR_COLLECTION) {
        (m.as_str(), m.start(), OccurrenceKind::LoopArray)
    } else {
        let body = caps.get(PLAIN_BODY)?;
        let raw = body.as_str();
        let leading = raw.len() - raw.trim_start().len();
        (raw.trim(), body.start() + leading, OccurrenceKind::Plain)
    };

    if name.is_empty() {
        return None;
    }

    Some((name, Span::at(start, name.len()), kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::split_sections;

    fn scan(body: &str) -> (String, Vec<UsedOccurrence>) {
        let source = format!("---JSON---\n{{}}\n---HTML---\n{body}");
        let occurrences = scan_expressions(&split_sections(&source));
        (source, occurrences)
    }

    fn names(occurrences: &[UsedOccurrence]) -> Vec<(&str, OccurrenceKind)> {
        occurrences
            .iter()
            .map(|o| (o.name.as_str(), o.kind))
            .collect()
    }

    #[test]
    fn classifies_expression_shapes() {
        let (_, found) = scan("{{#if vip}}{{#for item in items}}{{ item }}{{/for}}{{/if}}");
        assert_eq!(
            names(&found),
            vec![
                ("vip", OccurrenceKind::IfCondition),
                ("items", OccurrenceKind::LoopArray),
                ("item", OccurrenceKind::Plain),
            ]
        );
    }

    #[test]
    fn spans_point_at_names() {
        let (source, found) = scan("<p>{{  user  }} {{#if f}}{{#for f in fs}}</p>");
        for occurrence in &found {
            assert_eq!(occurrence.span.slice(&source), Some(occurrence.name.as_str()));
        }
        // `#if f` reports the name, not the "f" of "if"
        let if_f = found
            .iter()
            .find(|o| o.kind == OccurrenceKind::IfCondition)
            .unwrap();
        assert_eq!(&source[if_f.span.start - 1..if_f.span.end], " f");
    }

    #[test]
    fn closers_and_other_blocks_are_ignored() {
        let (_, found) = scan("{{/for}}{{/if}}{{#each x}}{{#if}}");
        assert!(found.is_empty(), "{found:?}");
    }

    #[test]
    fn block_with_trailing_space_is_not_an_occurrence() {
        let (_, found) = scan("{{#if ready }}");
        assert!(found.is_empty());
    }

    #[test]
    fn blank_expressions_are_skipped() {
        let (_, found) = scan("{{ }}{{\n}}");
        assert!(found.is_empty());
    }

    #[test]
    fn plain_names_keep_inner_punctuation() {
        let (_, found) = scan("{{ user.name }}{{first last}}");
        assert_eq!(
            names(&found),
            vec![
                ("user.name", OccurrenceKind::Plain),
                ("first last", OccurrenceKind::Plain),
            ]
        );
    }

    #[test]
    fn scans_html_then_text() {
        let source = "---JSON---\n{}\n---HTML---\n{{a}}\n---TEXT---\n{{b}}";
        let found = scan_expressions(&split_sections(source));
        assert_eq!(
            names(&found),
            vec![("a", OccurrenceKind::Plain), ("b", OccurrenceKind::Plain)]
        );
        assert_eq!(found[1].span.slice(source), Some("b"));
    }

    #[test]
    fn json_section_is_not_scanned() {
        let source = "---JSON---\n{\"name\": \"{{x}}\"}\n---HTML---\n<p></p>";
        assert!(scan_expressions(&split_sections(source)).is_empty());
    }
}
