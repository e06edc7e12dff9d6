//! Nova language server.
//!
//! A tower-lsp backend over the compiler pipeline: documents are re-parsed
//! and re-analyzed on every change (full sync), diagnostics are published
//! to the client, and hover answers with the type of the expression whose
//! starting token sits at the requested position.

pub mod analysis;
pub mod server;

pub use server::NovaBackend;

use tower_lsp::{LspService, Server};

/// Run the language server over stdin/stdout until the client disconnects.
pub async fn run_stdio() {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();
    let (service, socket) = LspService::new(NovaBackend::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
