//! Error types for ret-lint-core
//!
//! Findings about a template are never errors at this level; they are
//! reported as [`Diagnostic`](crate::Diagnostic)s. `LintError` covers misuse
//! of the engine itself and bad host input.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LintError {
    #[error("Lint context used before initialize() or after dispose()")]
    NotInitialized,

    #[error("Invalid RET settings: {0}")]
    InvalidSettings(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LintError>;
