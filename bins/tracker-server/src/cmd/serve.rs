use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use tracker_api::RecordStore;
use tracker_api_server::AppState;
use tracker_store::MemoryStore;

use crate::config::Effective;
use crate::error::ServerError;

/// Сколько ждать завершения in-flight запросов после Ctrl+C.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn run(eff: &Effective) -> Result<(), ServerError> {
    tracing::info!("tracker-server starting");

    // --- Store ---
    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
    tracing::info!(identifier_field = %eff.identifier_field, "in-memory store ready");

    // --- CancellationToken for graceful shutdown ---
    let token = CancellationToken::new();

    // --- API server (HTTP) ---
    let state = AppState::new(store.clone(), eff.identifier_field.as_str());
    let host = eff.host.clone();
    let port = eff.port;
    let api_token = token.clone();
    let mut api_handle = tokio::spawn(async move {
        tracker_api_server::run(&host, port, state, api_token).await
    });

    // --- Ожидание Ctrl+C (или раннего выхода сервера, например ошибки bind) ---
    tokio::select! {
        res = &mut api_handle => {
            res??;
            tracing::warn!("api server stopped unexpectedly");
            return Ok(());
        }
        sig = tokio::signal::ctrl_c() => {
            sig?;
            tracing::info!("shutting down...");
        }
    }

    token.cancel();

    // Drain: in-flight requests get DRAIN_TIMEOUT, then abort
    match tokio::time::timeout(DRAIN_TIMEOUT, &mut api_handle).await {
        Ok(res) => res??,
        Err(_) => {
            tracing::warn!(timeout = ?DRAIN_TIMEOUT, "api server did not drain in time, aborting");
            api_handle.abort();
        }
    }

    match store.count().await {
        Ok(discarded) => tracing::info!(discarded, "shutdown complete"),
        Err(e) => tracing::info!(error = %e, "shutdown complete"),
    }
    Ok(())
}
