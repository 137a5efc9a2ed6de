pub mod error;
mod http;


use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::catch_panic::CatchPanicLayer;

use tracker_api::RecordStore;

pub use error::{ApiError, ServeError};
pub use http::{DeleteResponse, StoreResponse};

/// JSON ключ идентификатора по умолчанию.
pub const DEFAULT_IDENTIFIER_FIELD: &str = "identifier";

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn RecordStore>,
    identifier_field: Arc<str>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, identifier_field: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            identifier_field: identifier_field.into(),
        }
    }

    pub fn with_store(store: Arc<dyn RecordStore>) -> Self {
        Self::new(store, DEFAULT_IDENTIFIER_FIELD)
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }
}

/// Все маршруты API.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(http::handle_index))
        .route("/api/data", post(http::handle_store_data))
        .route(
            "/api/data/trackstats",
            get(http::handle_trackstats).delete(http::handle_delete_trackstats),
        )
        .route(
            "/api/data/{identifier}",
            get(http::handle_get_data).delete(http::handle_delete_data),
        )
        .with_state(state)
        .layer(CatchPanicLayer::custom(error::panic_response))
}

/// Обслуживать уже открытый listener до отмены `shutdown`.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<(), ServeError> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(ServeError::Serve)
}

/// Record tracking HTTP API сервер на `host:port`.
pub async fn run(
    host: &str,
    port: u16,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<(), ServeError> {
    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| ServeError::bind(addr.clone(), e))?;

    let local = listener.local_addr().map_err(ServeError::LocalAddr)?;
    tracing::info!(addr = %local, "api server listening");

    serve(listener, state, shutdown).await
}
