//! LSP server implementation using tower-lsp.
//!
//! The server owns the open documents and one [`LintContext`]. Every
//! notification is turned into a trigger dispatched under the context lock,
//! after which the affected documents' diagnostics and decorations are sent
//! to the client. Locks are always taken documents first, then context.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};

use ret_lint_core::document::{DocumentStore, RET_LANGUAGE_ID};
use ret_lint_core::{DecorationSet, Document, LintContext, RetConfig, TriggerEvent};

use crate::capabilities::server_capabilities;
use crate::convert;
use crate::notification::DecorationsNotification;

/// What the client must be told after a document was (re)analyzed.
struct DocumentUpdate {
    uri: Url,
    version: Option<i32>,
    diagnostics: Vec<Diagnostic>,
    decorations: Option<DecorationSet>,
}

impl DocumentUpdate {
    fn collect(uri: Url, doc: &Document, context: &LintContext) -> Self {
        let diagnostics = context
            .diagnostics(doc.uri())
            .unwrap_or_default()
            .iter()
            .map(convert::diagnostic_to_lsp)
            .collect();
        Self {
            uri,
            version: doc.version(),
            diagnostics,
            decorations: context.decorations(doc.uri()).cloned(),
        }
    }
}

/// The RET language server.
pub struct RetLanguageServer {
    /// The LSP client for sending notifications.
    client: Client,
    /// Document store for managing open documents.
    documents: Arc<RwLock<DocumentStore>>,
    context: Arc<Mutex<LintContext>>,
}

impl RetLanguageServer {
    /// Create a new language server instance.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            documents: Arc::new(RwLock::new(DocumentStore::new())),
            context: Arc::new(Mutex::new(LintContext::default())),
        }
    }

    /// Dispatch a per-document trigger and push the results to the client.
    async fn refresh(&self, uri: Url, event: fn(&Document) -> TriggerEvent<'_>) {
        let update = {
            let documents = self.documents.read().await;
            let Some(doc) = documents.get(uri.as_str()) else {
                return;
            };
            let mut context = self.context.lock().await;
            if let Err(err) = context.dispatch(&event(doc)) {
                tracing::warn!(%uri, error = %err, "dropping document event");
                return;
            }
            DocumentUpdate::collect(uri, doc, &context)
        };
        self.publish(update).await;
    }

    async fn publish(&self, update: DocumentUpdate) {
        tracing::debug!(
            uri = %update.uri,
            diagnostics = update.diagnostics.len(),
            "publishing diagnostics"
        );
        self.client
            .publish_diagnostics(update.uri, update.diagnostics, update.version)
            .await;
        if let Some(decorations) = update.decorations {
            self.send_decorations(decorations).await;
        }
    }

    async fn send_decorations(&self, decorations: DecorationSet) {
        self.client
            .send_notification::<DecorationsNotification>(decorations)
            .await;
    }
}

/// The language id the linter should see for a document.
///
/// Clients without a RET language mode report `.ret` files as plain text.
fn effective_language_id(uri: &Url, language_id: String) -> String {
    if language_id != RET_LANGUAGE_ID && uri.path().ends_with(".ret") {
        RET_LANGUAGE_ID.to_string()
    } else {
        language_id
    }
}

/// Read configuration from client settings, falling back to `fallback`.
fn read_config(settings: Option<&serde_json::Value>, fallback: &RetConfig) -> RetConfig {
    let Some(settings) = settings else {
        return fallback.clone();
    };
    match RetConfig::from_settings(settings) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(error = %err, "ignoring invalid RET settings");
            fallback.clone()
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for RetLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let config = read_config(params.initialization_options.as_ref(), &RetConfig::default());
        {
            let mut context = self.context.lock().await;
            *context = LintContext::new(config);
            context.initialize();
        }

        Ok(InitializeResult {
            capabilities: server_capabilities(),
            server_info: Some(ServerInfo {
                name: "ret-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        if let Err(err) = self
            .context
            .lock()
            .await
            .dispatch(&TriggerEvent::InitialLoad { active: None })
        {
            tracing::warn!(error = %err, "initial load skipped");
        }
        self.client
            .log_message(MessageType::INFO, "RET LSP server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        self.context.lock().await.dispose();
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let language_id = effective_language_id(&uri, params.text_document.language_id);

        {
            let mut documents = self.documents.write().await;
            documents.open(
                uri.as_str(),
                language_id,
                params.text_document.text,
                params.text_document.version,
            );
        }

        // Opening a document focuses it in the client.
        self.refresh(uri, |doc: &Document| TriggerEvent::ActiveEditorChanged(doc)).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        // We're using full document sync, so take the last change
        if let Some(change) = params.content_changes.into_iter().last() {
            {
                let mut documents = self.documents.write().await;
                documents.change(uri.as_str(), change.text, version);
            }

            self.refresh(uri, |doc: &Document| TriggerEvent::DocumentChanged(doc)).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;

        let cleared = {
            let mut documents = self.documents.write().await;
            documents.close(uri.as_str());
            let mut context = self.context.lock().await;
            if let Err(err) = context.dispatch(&TriggerEvent::DocumentClosed { uri: uri.as_str() }) {
                tracing::warn!(%uri, error = %err, "dropping close event");
            }
            context
                .state()
                .ok()
                .map(|state| DecorationSet::cleared(uri.as_str(), state.styles()))
        };

        self.client
            .publish_diagnostics(uri, Vec::new(), None)
            .await;
        if let Some(cleared) = cleared {
            self.send_decorations(cleared).await;
        }
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        let restyled = {
            let documents = self.documents.read().await;
            let visible: Vec<&Document> = documents.documents().collect();
            let mut context = self.context.lock().await;
            let config = read_config(Some(&params.settings), context.config());
            let before = context.state().ok().map(|state| state.styles().clone());

            if let Err(err) = context.dispatch(&TriggerEvent::ConfigurationChanged {
                config,
                visible: visible.clone(),
            }) {
                tracing::warn!(error = %err, "dropping configuration change");
                return;
            }

            let after = context.state().ok().map(|state| state.styles().clone());
            if before == after {
                Vec::new()
            } else {
                visible
                    .iter()
                    .filter_map(|doc| context.decorations(doc.uri()).cloned())
                    .collect::<Vec<_>>()
            }
        };

        for decorations in restyled {
            self.send_decorations(decorations).await;
        }
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let position = params.text_document_position;
        let documents = self.documents.read().await;
        let Some(doc) = documents.get(position.text_document.uri.as_str()) else {
            return Ok(None);
        };

        let candidates =
            ret_lint_core::complete_at(doc, convert::position_from_lsp(&position.position));
        Ok(candidates.map(|candidates| {
            CompletionResponse::Array(candidates.iter().map(convert::completion_to_lsp).collect())
        }))
    }
}

/// Run the LSP server over stdio.
pub async fn run_server() {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(RetLanguageServer::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
