//! Tower-lsp backend implementation for the Nova language server.
//!
//! Supports:
//! - textDocument/didOpen, didChange, didClose (published diagnostics)
//! - textDocument/hover (type of the expression at the cursor)
//! - shutdown

use std::collections::HashMap;
use std::sync::Mutex;

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use crate::analysis::{self, AnalysisResult};

/// Per-document state stored in the server.
struct DocumentState {
    /// The latest source text.
    source: String,
    /// The latest analysis result.
    analysis: AnalysisResult,
}

/// The Nova LSP backend.
///
/// Holds the client handle (for publishing diagnostics) and an in-memory
/// document store keyed by URI.
pub struct NovaBackend {
    client: Client,
    documents: Mutex<HashMap<String, DocumentState>>,
}

impl NovaBackend {
    /// Create a new backend.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            documents: Mutex::new(HashMap::new()),
        }
    }

    /// Analyze a document, store the result, and publish its diagnostics.
    async fn analyze_and_publish(&self, uri: Url, source: String) {
        let analysis = analysis::analyze_document(&source);
        let diagnostics = analysis.diagnostics.clone();

        {
            let mut docs = self.documents.lock().unwrap();
            docs.insert(uri.to_string(), DocumentState { source, analysis });
        }

        self.client
            .publish_diagnostics(uri, diagnostics, None)
            .await;
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for NovaBackend {
    async fn initialize(&self, _: InitializeParams) -> Result<InitializeResult> {
        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "Nova LSP server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let source = params.text_document.text;
        self.analyze_and_publish(uri, source).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        // Full sync: the first content change carries the whole document.
        if let Some(change) = params.content_changes.into_iter().next() {
            self.analyze_and_publish(uri, change.text).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        {
            let mut docs = self.documents.lock().unwrap();
            docs.remove(&params.text_document.uri.to_string());
        }
        self.client
            .publish_diagnostics(params.text_document.uri, vec![], None)
            .await;
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = params
            .text_document_position_params
            .text_document
            .uri
            .to_string();
        let position = params.text_document_position_params.position;

        let docs = self.documents.lock().unwrap();
        let Some(doc) = docs.get(&uri) else {
            return Ok(None);
        };

        let type_name = analysis::type_at_position(&doc.source, &doc.analysis, &position);
        Ok(type_name.map(|name| Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::PlainText,
                value: format!("Type: {}", name),
            }),
            range: None,
        }))
    }
}
