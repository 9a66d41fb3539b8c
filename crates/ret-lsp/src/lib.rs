//! RET Language Server Protocol implementation.
//!
//! This crate provides the LSP server for RET email templates, wrapping
//! `ret-lint-core` with the tower-lsp framework.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                            ret-lsp                             │
//! │       tower-lsp wrapper, JSON-RPC/stdio, `ret lsp` command     │
//! │                                                                │
//! │  ┌─────────────┐  ┌─────────────┐  ┌────────────────────────┐  │
//! │  │  server.rs  │  │ convert.rs  │  │    notification.rs     │  │
//! │  │  triggers   │  │ Core ↔ LSP  │  │   `ret/decorations`    │  │
//! │  └──────┬──────┘  └──────┬──────┘  └────────────────────────┘  │
//! │         │                │                                     │
//! │         └────────────────┴──────────────────┐                  │
//! │                                             │                  │
//! │  ┌──────────────────────────────────────────▼───────────────┐  │
//! │  │                      ret-lint-core                       │  │
//! │  │          (LintContext, analysis, decorations)            │  │
//! │  └──────────────────────────────────────────────────────────┘  │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! The LSP server is invoked via the `ret lsp` subcommand:
//!
//! ```bash
//! ret lsp
//! ```
//!
//! Or programmatically:
//!
//! ```rust,ignore
//! ret_lsp::run_server().await;
//! ```
//!
//! Separator colours are read from `initializationOptions` and from
//! `workspace/didChangeConfiguration`, either as the bare settings object or
//! nested under `"ret"`.

pub mod capabilities;
pub mod convert;
pub mod notification;
pub mod server;

pub use notification::DecorationsNotification;
pub use server::run_server;
