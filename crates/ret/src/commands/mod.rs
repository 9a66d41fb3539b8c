//! Command implementations for the RET CLI
//!
//! Each command module handles the CLI interface and delegates to
//! ret-lint-core or ret-lsp for the actual work.

pub mod check;
pub mod lsp;
