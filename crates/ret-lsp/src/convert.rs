//! Conversion between ret-lint-core types and tower_lsp::lsp_types.

use tower_lsp::lsp_types::{
    CompletionItem, CompletionItemKind, Diagnostic as LspDiagnostic,
    DiagnosticSeverity as LspSeverity, NumberOrString, Position as LspPosition,
    Range as LspRange,
};

use ret_lint_core::types::{
    CompletionCandidate, CompletionKind, Diagnostic, DiagnosticSeverity, Position, Range,
};

/// Convert a ret-lint-core Position to an lsp-types Position.
pub fn position_to_lsp(pos: &Position) -> LspPosition {
    LspPosition {
        line: pos.line,
        character: pos.character,
    }
}

/// Convert an lsp-types Position to a ret-lint-core Position.
pub fn position_from_lsp(pos: &LspPosition) -> Position {
    Position::new(pos.line, pos.character)
}

/// Convert a ret-lint-core Range to an lsp-types Range.
pub fn range_to_lsp(range: &Range) -> LspRange {
    LspRange {
        start: position_to_lsp(&range.start),
        end: position_to_lsp(&range.end),
    }
}

pub fn severity_to_lsp(severity: &DiagnosticSeverity) -> LspSeverity {
    match severity {
        DiagnosticSeverity::Error => LspSeverity::ERROR,
        DiagnosticSeverity::Warning => LspSeverity::WARNING,
    }
}

/// Convert a ret-lint-core Diagnostic to an lsp-types Diagnostic.
pub fn diagnostic_to_lsp(diag: &Diagnostic) -> LspDiagnostic {
    LspDiagnostic {
        range: range_to_lsp(&diag.range),
        severity: Some(severity_to_lsp(&diag.severity)),
        code: diag.code.clone().map(NumberOrString::String),
        code_description: None,
        source: diag.source.clone(),
        message: diag.message.clone(),
        related_information: None,
        tags: None,
        data: None,
    }
}

/// Convert a completion candidate to an lsp-types CompletionItem.
pub fn completion_to_lsp(candidate: &CompletionCandidate) -> CompletionItem {
    let kind = match candidate.kind {
        CompletionKind::Variable => CompletionItemKind::VARIABLE,
    };
    CompletionItem {
        label: candidate.label.clone(),
        kind: Some(kind),
        ..Default::default()
    }
}
