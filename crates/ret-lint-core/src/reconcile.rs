//! Reconciliation of declared and used variables.
//!
//! A use is declared when its name is declared in the metadata, or when it
//! sits inside a loop block whose iterator has that name. Every undeclared
//! use is an error at the use; every declared variable that is never used is
//! a warning at its declaration in the JSON section.

use std::collections::HashSet;

use indexmap::IndexSet;

use crate::codes;
use crate::document::Document;
use crate::expressions::{OccurrenceKind, UsedOccurrence};
use crate::loops::LoopScope;
use crate::metadata::find_property_key;
use crate::sections::Section;
use crate::types::{Diagnostic, Range};

/// Everything the reconciliation pass looks at.
#[derive(Debug, Clone, Copy)]
pub struct Bindings<'a> {
    pub declared: &'a IndexSet<String>,
    pub occurrences: &'a [UsedOccurrence],
    pub loop_scopes: &'a [LoopScope],
}

impl Bindings<'_> {
    pub fn is_declared(&self, occurrence: &UsedOccurrence) -> bool {
        self.declared.contains(&occurrence.name)
            || self
                .loop_scopes
                .iter()
                .any(|scope| scope.declares(occurrence))
    }

    /// Names counted as used when looking for unused declarations.
    pub fn referenced(&self) -> HashSet<&str> {
        self.occurrences
            .iter()
            .filter(|o| o.kind != OccurrenceKind::LoopIterator)
            .map(|o| o.name.as_str())
            .collect()
    }
}

/// Produce undeclared and unused variable diagnostics.
///
/// `json` is the JSON section, used to locate declarations.
pub fn reconcile(
    doc: &Document,
    json: Option<&Section<'_>>,
    bindings: &Bindings<'_>,
) -> Vec<Diagnostic> {
    let mut diagnostics: Vec<Diagnostic> = bindings
        .occurrences
        .iter()
        .filter(|occurrence| !bindings.is_declared(occurrence))
        .map(|occurrence| {
            Diagnostic::error(
                doc.range_of(occurrence.span),
                format!("Undeclared variable: '{}'", occurrence.name),
            )
            .with_code(codes::UNDECLARED_VARIABLE)
        })
        .collect();

    let referenced = bindings.referenced();
    for name in bindings.declared {
        if referenced.contains(name.as_str()) {
            continue;
        }
        diagnostics.push(unused_variable(doc, json, name));
    }

    diagnostics
}

fn unused_variable(doc: &Document, json: Option<&Section<'_>>, name: &str) -> Diagnostic {
    let declaration = json.and_then(|section| {
        find_property_key(section.content, name).map(|span| span.offset_by(section.start_offset))
    });

    let diagnostic = match declaration {
        Some(span) => Diagnostic::warning(doc.range_of(span), format!("Unused variable: '{name}'")),
        None => Diagnostic::warning(
            Range::document_start(),
            format!("Unused variable: '{name}' (Declaration position not found)"),
        ),
    };
    diagnostic.with_code(codes::UNUSED_VARIABLE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expressions::scan_expressions;
    use crate::loops::extract_loop_scopes;
    use crate::sections::split_sections;
    use crate::types::{DiagnosticSeverity, Position};

    fn run(doc: &Document, declared: &[&str]) -> Vec<Diagnostic> {
        let split = split_sections(doc.content());
        let declared: IndexSet<String> = declared.iter().map(|s| s.to_string()).collect();
        let occurrences = scan_expressions(&split);
        let loop_scopes = extract_loop_scopes(doc.content());
        let bindings = Bindings {
            declared: &declared,
            occurrences: &occurrences,
            loop_scopes: &loop_scopes,
        };
        reconcile(doc, split.json.as_ref(), &bindings)
    }

    fn messages(diagnostics: &[Diagnostic]) -> Vec<&str> {
        let mut messages: Vec<_> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        messages.sort_unstable();
        messages
    }

    #[test]
    fn undeclared_use_is_an_error_at_the_name() {
        let doc = Document::new("t.ret", "---HTML---\n<p>{{b}}</p>");
        let diagnostics = run(&doc, &[]);

        assert_eq!(messages(&diagnostics), vec!["Undeclared variable: 'b'"]);
        assert_eq!(diagnostics[0].severity, DiagnosticSeverity::Error);
        assert_eq!(diagnostics[0].range.start, Position::new(1, 5));
        assert_eq!(diagnostics[0].range.end, Position::new(1, 6));
    }

    #[test]
    fn iterator_is_declared_only_inside_its_loop() {
        let doc = Document::new(
            "t.ret",
            "---HTML---\n{{#for item in list}}{{item}}{{/for}}\n{{item}}",
        );
        let diagnostics = run(&doc, &["list"]);

        assert_eq!(messages(&diagnostics), vec!["Undeclared variable: 'item'"]);
        assert_eq!(diagnostics[0].range.start.line, 2);
    }

    #[test]
    fn unused_declaration_warns_at_its_key() {
        let doc = Document::new(
            "t.ret",
            "---JSON---\n{\"variables\": {\"a\": 1}}\n---HTML---\n<p></p>",
        );
        let diagnostics = run(&doc, &["a"]);

        assert_eq!(messages(&diagnostics), vec!["Unused variable: 'a'"]);
        let diag = &diagnostics[0];
        assert_eq!(diag.severity, DiagnosticSeverity::Warning);
        assert_eq!(diag.range.start, Position::new(1, 16));
        assert_eq!(diag.range.end, Position::new(1, 17));
    }

    #[test]
    fn unlocatable_declaration_falls_back_to_document_start() {
        let doc = Document::new("t.ret", "---JSON---\n{\"variables\": {\"\\u0061\": 1}}\n---HTML---\n<p></p>");
        let diagnostics = run(&doc, &["a"]);

        assert_eq!(
            messages(&diagnostics),
            vec!["Unused variable: 'a' (Declaration position not found)"]
        );
        assert_eq!(diagnostics[0].range, Range::document_start());
    }

    #[test]
    fn loop_collection_and_condition_count_as_uses() {
        let doc = Document::new(
            "t.ret",
            "---JSON---\n{\"variables\": {\"list\": [], \"show\": true}}\n---HTML---\n{{#if show}}{{#for x in list}}{{x}}{{/for}}{{/if}}",
        );
        assert!(run(&doc, &["list", "show"]).is_empty());
    }

    #[test]
    fn iterator_shadowing_a_declared_name_counts_as_use() {
        let doc = Document::new(
            "t.ret",
            "---JSON---\n{\"variables\": {\"x\": 1, \"xs\": []}}\n---HTML---\n{{#for x in xs}}{{x}}{{/for}}",
        );
        assert!(run(&doc, &["x", "xs"]).is_empty());
    }

    #[test]
    fn loop_iterator_occurrences_are_not_referenced() {
        let declared: IndexSet<String> = ["a".to_string()].into_iter().collect();
        let occurrences = vec![UsedOccurrence {
            name: "a".into(),
            span: ret_source_map::Span::at(0, 1),
            kind: OccurrenceKind::LoopIterator,
        }];
        let bindings = Bindings {
            declared: &declared,
            occurrences: &occurrences,
            loop_scopes: &[],
        };
        assert!(bindings.referenced().is_empty());
        assert!(bindings.is_declared(&occurrences[0]));
    }
}
