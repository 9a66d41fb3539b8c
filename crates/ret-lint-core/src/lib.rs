//! Transport-agnostic linting for RET email templates.
//!
//! A RET document carries three sections: JSON metadata declaring the
//! template's variables, an HTML body and a plain TEXT body. This crate
//! checks that the metadata is well formed and that the bodies reference
//! exactly the variables the metadata declares. It has no protocol
//! dependencies; hosts drive it through [`LintContext`] or call the analysis
//! functions directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          ret-lint-core                          │
//! │  (sections, metadata, expressions, loops, reconcile, context)   │
//! └─────────────────────────────────────────────────────────────────┘
//!             │                                    │
//!             ▼                                    ▼
//! ┌───────────────────────┐          ┌─────────────────────────────┐
//! │        ret-lsp        │          │          ret check          │
//! │  (Native LSP server)  │          │     (command-line linter)   │
//! └───────────────────────┘          └─────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust
//! use ret_lint_core::{Document, analyze_document};
//!
//! let content = "---JSON---\n{\"name\": \"hi\", \"variables\": {\"user\": \"\"}}\n---HTML---\n<p>{{user}}</p>\n";
//! let doc = Document::new("hi.ret", content);
//!
//! let analysis = analyze_document(&doc);
//! assert!(analysis.diagnostics.is_empty());
//! assert_eq!(analysis.occurrences.len(), 1);
//! ```

pub mod analysis;
pub mod codes;
pub mod completion;
pub mod config;
pub mod context;
pub mod decorations;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod expressions;
pub mod loops;
pub mod metadata;
pub mod reconcile;
pub mod sections;
pub mod types;

// Re-export main types and functions for convenience
pub use analysis::{DocumentAnalysis, analyze_document};
pub use completion::{complete_at, complete_at_offset, declared_variables};
pub use config::RetConfig;
pub use context::{LintContext, LintState, Trigger, TriggerEvent, TriggerHandler};
pub use decorations::{DecorationSet, DecorationStyle, DecorationStyles, find_separators};
pub use diagnostics::{DiagnosticCollection, get_diagnostics};
pub use document::{Document, DocumentStore, RET_LANGUAGE_ID};
pub use error::{LintError, Result};
pub use expressions::{OccurrenceKind, UsedOccurrence, scan_expressions};
pub use loops::{LoopScope, extract_loop_scopes};
pub use metadata::{Metadata, MetadataValidation, validate_metadata};
pub use reconcile::reconcile;
pub use sections::{Section, SectionKind, SectionSplit, split_sections};
pub use types::{
    CompletionCandidate, CompletionKind, Diagnostic, DiagnosticSeverity, Position, Range,
};
