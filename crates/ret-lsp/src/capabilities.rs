//! LSP capability negotiation.

use tower_lsp::lsp_types::{
    CompletionOptions, ServerCapabilities, TextDocumentSyncCapability, TextDocumentSyncKind,
    TextDocumentSyncOptions,
};

/// Characters that make the client ask for completions.
///
/// The second `{` of `{{` is what matters; the core decides whether the
/// cursor really follows an expression opener.
pub const COMPLETION_TRIGGER_CHARACTERS: [&str; 1] = ["{"];

/// Get the server capabilities to report to the client.
pub fn server_capabilities() -> ServerCapabilities {
    ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Options(
            TextDocumentSyncOptions {
                open_close: Some(true),
                // Every pass analyzes the whole document, so full sync is all we need.
                change: Some(TextDocumentSyncKind::FULL),
                will_save: None,
                will_save_wait_until: None,
                save: None,
            },
        )),

        completion_provider: Some(CompletionOptions {
            trigger_characters: Some(
                COMPLETION_TRIGGER_CHARACTERS
                    .iter()
                    .map(|c| c.to_string())
                    .collect(),
            ),
            ..Default::default()
        }),

        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capabilities_include_full_document_sync() {
        let caps = server_capabilities();
        match caps.text_document_sync {
            Some(TextDocumentSyncCapability::Options(options)) => {
                assert_eq!(options.open_close, Some(true));
                assert_eq!(options.change, Some(TextDocumentSyncKind::FULL));
            }
            other => panic!("unexpected sync capability: {other:?}"),
        }
    }

    #[test]
    fn completion_triggers_on_brace() {
        let caps = server_capabilities();
        let completion = caps.completion_provider.unwrap();
        assert_eq!(completion.trigger_characters, Some(vec!["{".to_string()]));
    }

    #[test]
    fn no_symbol_or_hover_support() {
        let caps = server_capabilities();
        assert!(caps.document_symbol_provider.is_none());
        assert!(caps.hover_provider.is_none());
    }
}
