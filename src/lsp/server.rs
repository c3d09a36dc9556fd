use anyhow::Result;
use tokio::io::{stdin, stdout};
use tower_lsp::{LspService, Server};

use crate::Config;
use crate::lsp::backend::Backend;
use crate::profile::ProfileRegistry;
use crate::validation::Auditor;

/// Start the LSP server over stdio
pub async fn serve(config: Config) -> Result<()> {
    let registry = ProfileRegistry::from_config(&config);
    log::info!(
        "Loaded {} profile(s): {}",
        registry.len(),
        registry
            .list()
            .map(|loaded| loaded.profile.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let auditor = Auditor::new(registry).with_forced_type(config.forced_document_type);

    let (service, socket) =
        LspService::build(move |client| Backend::new(client, config.clone(), auditor.clone()))
            .finish();

    Server::new(stdin(), stdout(), socket).serve(service).await;

    Ok(())
}
