use std::path::PathBuf;
use std::sync::Arc;

use tower_lsp::{LspService, Server};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{LOG_ENV, LOG_FILE_PREFIX, LspConfig, log_dir};
use crate::icons::manager::IconManager;
use crate::icons::registries::NpmRegistry;
use crate::icons::store::SnapshotStore;
use crate::lsp::backend::Backend;

/// Log to a daily rolling file; stdout carries JSON-RPC.
///
/// The returned guard flushes pending lines when dropped.
fn init_logging() -> Option<WorkerGuard> {
    let dir = log_dir();
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("Failed to create log directory {:?}: {}", dir, e);
        return None;
    }

    let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Some(guard)
}

pub async fn run_server(storage_dir: PathBuf, registry_url: String) -> anyhow::Result<()> {
    let _guard = init_logging();

    info!(
        "Starting mdi-lsp {} (storage {:?}, registry {})",
        env!("CARGO_PKG_VERSION"),
        storage_dir,
        registry_url
    );

    if let Err(e) = tokio::fs::create_dir_all(&storage_dir).await {
        warn!("Failed to create storage directory {:?}: {}", storage_dir, e);
    }

    let manager = Arc::new(IconManager::new(
        LspConfig::default(),
        Arc::new(NpmRegistry::new(&registry_url)),
        Arc::new(SnapshotStore::new(storage_dir)),
    ));

    let (service, socket) = LspService::new(|client| Backend::new(client, manager));
    Server::new(tokio::io::stdin(), tokio::io::stdout(), socket)
        .serve(service)
        .await;

    info!("mdi-lsp stopped");
    Ok(())
}
