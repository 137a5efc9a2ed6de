use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use tracker_api::StoreError;

/// Ошибка обработки запроса. Единственное место, где ошибки
/// превращаются в HTTP статусы, — `IntoResponse` ниже.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Тело запроса не прошло проверку → 400.
    #[error("{0}")]
    Validation(String),

    /// Идентификатор не найден → 404.
    #[error("record '{0}' not found")]
    NotFound(String),

    /// Любой другой сбой → 500, текст уходит клиенту.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(identifier) => ApiError::NotFound(identifier),
            StoreError::Backend(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Validation(msg) => {
                tracing::warn!(error = %msg, "rejected request");
                json!({ "error": msg })
            }
            ApiError::NotFound(identifier) => {
                tracing::debug!(identifier = %identifier, "record not found");
                json!({ "error": "Record not found" })
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                json!({ "error": "Internal server error", "message": msg })
            }
        };
        (status, axum::Json(body)).into_response()
    }
}

/// Паника внутри маршрута → тот же 500, что и `ApiError::Internal`.
pub(crate) fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    ApiError::Internal(message).into_response()
}

/// Ошибка запуска/работы HTTP сервера.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("bind api {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("local addr: {0}")]
    LocalAddr(std::io::Error),

    #[error("axum serve: {0}")]
    Serve(std::io::Error),
}

impl ServeError {
    pub(crate) fn bind(addr: impl Into<String>, source: std::io::Error) -> Self {
        ServeError::Bind {
            addr: addr.into(),
            source,
        }
    }
}
