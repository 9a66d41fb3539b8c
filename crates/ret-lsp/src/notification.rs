//! Custom notifications sent to the client.

use ret_lint_core::DecorationSet;
use tower_lsp::lsp_types::notification::Notification;

/// Separator decorations for one document.
///
/// Each notification replaces every decoration the client drew for that
/// document before. The payload is a [`DecorationSet`]: one layer per
/// section kind with its colour, font weight and marker ranges.
#[allow(clippy::empty_enum)]
#[derive(Debug)]
pub enum DecorationsNotification {}

impl Notification for DecorationsNotification {
    type Params = DecorationSet;
    const METHOD: &'static str = "ret/decorations";
}

#[cfg(test)]
mod tests {
    use super::*;
    use ret_lint_core::{DecorationStyles, Document};

    #[test]
    fn payload_shape() {
        let doc = Document::new("file:///a.ret", "---HTML---\n<p></p>");
        let set = DecorationSet::for_document(&doc, &DecorationStyles::default());
        let value = serde_json::to_value(&set).unwrap();

        assert_eq!(DecorationsNotification::METHOD, "ret/decorations");
        assert_eq!(value["uri"], "file:///a.ret");
        assert_eq!(value["layers"][1]["kind"], "html");
        assert_eq!(value["layers"][1]["style"]["color"], "#E44D26");
        assert_eq!(
            value["layers"][1]["ranges"][0]["end"],
            serde_json::json!({"line": 0, "character": 10})
        );
    }
}
