//! LSP server command implementation.

use anyhow::Result;

/// Execute the LSP server.
///
/// This starts the RET Language Server Protocol server, communicating over
/// stdio with JSON-RPC messages. Logs go to stderr.
pub fn execute() -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;

    tracing::info!("starting RET language server on stdio");
    runtime.block_on(async {
        ret_lsp::run_server().await;
    });

    Ok(())
}
