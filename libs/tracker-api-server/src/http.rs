use std::collections::BTreeMap;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use serde::Serialize;
use serde_json::{Value, json};

use tracker_api::{Payload, Record, RecordView, now};

use crate::AppState;
use crate::error::ApiError;

// ═══════════════════════════════════════════════════════════════
//  GET /
// ═══════════════════════════════════════════════════════════════

pub(crate) async fn handle_index() -> Json<Value> {
    Json(json!({
        "message": "Record Tracking API",
        "endpoints": {
            "POST /api/data": "Submit record data",
            "GET /api/data/trackstats": "Get all records",
            "GET /api/data/<identifier>": "Get a specific record",
            "DELETE /api/data/<identifier>": "Delete a record",
        }
    }))
}

// ═══════════════════════════════════════════════════════════════
//  POST /api/data
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
pub struct StoreResponse {
    pub success: bool,
    pub message: String,
    pub username: String,
    pub timestamp: String,
}

/// Тело разбирается вручную, чтобы любой некорректный JSON давал 400
/// с нашим форматом ошибки, а не rejection axum.
pub(crate) async fn handle_store_data(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StoreResponse>, ApiError> {
    let value: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::Validation(format!("invalid JSON body: {e}")))?;

    let (identifier, data) = split_identifier(value, &state.identifier_field)?;
    let record = Record::new(data);
    let timestamp = record.updated_at.to_rfc3339();

    let upsert = state.store.put(&identifier, record).await?;
    tracing::info!(identifier = %identifier, action = %upsert, "record stored");

    Ok(Json(StoreResponse {
        success: true,
        message: format!("Data {upsert} for {identifier}"),
        username: identifier,
        timestamp,
    }))
}

/// Отделить идентификатор от остальных полей объекта.
fn split_identifier(value: Value, field: &str) -> Result<(String, Payload), ApiError> {
    let Value::Object(mut data) = value else {
        return Err(ApiError::Validation(
            "request body must be a JSON object".to_string(),
        ));
    };

    let identifier = match data.remove(field) {
        Some(Value::String(s)) => s,
        Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
        Some(Value::Array(_) | Value::Object(_)) => {
            return Err(ApiError::Validation(format!(
                "{field} must be a string, number or boolean"
            )));
        }
        Some(Value::Null) | None => {
            return Err(ApiError::Validation(format!("{field} is required")));
        }
    };

    Ok((identifier, data))
}

// ═══════════════════════════════════════════════════════════════
//  GET /api/data/trackstats
// ═══════════════════════════════════════════════════════════════

pub(crate) async fn handle_trackstats(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, RecordView>>, ApiError> {
    let now = now();
    let records = state.store.list().await?;
    tracing::debug!(count = records.len(), "listing records");

    let stats = records
        .into_iter()
        .map(|(identifier, record)| (identifier, record.view(now)))
        .collect();
    Ok(Json(stats))
}

// ═══════════════════════════════════════════════════════════════
//  GET /api/data/{identifier}
// ═══════════════════════════════════════════════════════════════

pub(crate) async fn handle_get_data(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Json<BTreeMap<String, RecordView>>, ApiError> {
    let record = state.store.get(&identifier).await?;
    tracing::debug!(identifier = %identifier, "record read");

    let view = record.view(now());
    Ok(Json(BTreeMap::from([(identifier, view)])))
}

// ═══════════════════════════════════════════════════════════════
//  DELETE /api/data/{identifier}
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

pub(crate) async fn handle_delete_data(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    delete_record(&state, identifier).await
}

/// `/api/data/trackstats` — статический маршрут и перекрывает
/// `{identifier}`, поэтому DELETE для него подключён отдельно.
pub(crate) async fn handle_delete_trackstats(
    State(state): State<AppState>,
) -> Result<Json<DeleteResponse>, ApiError> {
    delete_record(&state, "trackstats".to_string()).await
}

async fn delete_record(
    state: &AppState,
    identifier: String,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.store.delete(&identifier).await?;
    tracing::info!(identifier = %identifier, "record deleted");

    Ok(Json(DeleteResponse {
        success: true,
        message: format!("Data deleted for {identifier}"),
    }))
}
