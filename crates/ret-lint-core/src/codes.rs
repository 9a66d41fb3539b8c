//! Diagnostic codes.
//!
//! Codes are stable identifiers attached to every diagnostic the linter
//! emits, so hosts and tests can match findings without parsing messages.

pub const JSON_SYNTAX: &str = "json-syntax";
pub const UNKNOWN_PROPERTY: &str = "unknown-property";
pub const INVALID_NAME: &str = "invalid-name";
pub const MISSING_VARIABLES: &str = "missing-variables";
pub const INVALID_VARIABLES: &str = "invalid-variables";
pub const INVALID_THEME: &str = "invalid-theme";
pub const UNDECLARED_VARIABLE: &str = "undeclared-variable";
pub const UNUSED_VARIABLE: &str = "unused-variable";
pub const INTERNAL_ERROR: &str = "internal-error";
