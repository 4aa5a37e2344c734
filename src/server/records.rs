//! Record CRUD endpoints.

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, FromRequest, Path, Request, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use anyhow::Context;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use super::state::GuardedRecordStore;
use super::ApiError;
use crate::record_store::{Record, RecordStore};

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

/// The `value` of a create or update request: a JSON object body whose
/// `value` field is a non-empty string.
pub struct ValueBody(pub String);

fn has_json_content_type(headers: &HeaderMap) -> bool {
    let content_type = match headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    {
        Some(content_type) => content_type,
        None => return false,
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

fn parse_value(bytes: &[u8]) -> Result<String, ApiError> {
    let body: Value = serde_json::from_slice(bytes)
        .map_err(|_| ApiError::BadRequest("Request body must be a JSON object"))?;
    let fields = body
        .as_object()
        .ok_or(ApiError::BadRequest("Request body must be a JSON object"))?;

    match fields.get("value") {
        Some(Value::String(value)) if !value.is_empty() => Ok(value.clone()),
        None | Some(Value::Null) | Some(Value::String(_)) => {
            Err(ApiError::BadRequest("Value is required"))
        }
        Some(_) => Err(ApiError::BadRequest("Value must be a string")),
    }
}

impl<S: Send + Sync> FromRequest<S> for ValueBody {
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !has_json_content_type(request.headers()) {
            return Err(ApiError::BadRequest("Content-Type must be application/json"));
        }
        let bytes = Bytes::from_request(request, state)
            .await
            .map_err(|_| ApiError::BadRequest("Could not read request body"))?;
        parse_value(&bytes).map(ValueBody)
    }
}

/// Ids are assigned by SQLite starting from 1, anything else is rejected.
fn record_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    match path {
        Ok(Path(id)) if id >= 1 => Ok(id),
        _ => Err(ApiError::BadRequest("Invalid record id")),
    }
}

/// Runs a store operation on the blocking pool, a write may sit on the
/// database lock for up to the busy timeout.
async fn with_store<T, F>(store: GuardedRecordStore, operation: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&dyn RecordStore) -> anyhow::Result<T> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || operation(store.as_ref()))
        .await
        .context("Record store task did not complete")?;
    Ok(result?)
}

/// GET /data
pub async fn list_records(
    State(store): State<GuardedRecordStore>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let records = with_store(store, |store| store.list_records()).await?;
    Ok(Json(records))
}

/// POST /data
pub async fn add_record(
    State(store): State<GuardedRecordStore>,
    ValueBody(value): ValueBody,
) -> Result<impl IntoResponse, ApiError> {
    let id = with_store(store, move |store| store.add_record(&value)).await?;
    info!("Added record {}", id);
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Data added successfully",
        }),
    ))
}

/// PUT /data/{id}
pub async fn update_record(
    State(store): State<GuardedRecordStore>,
    id: Result<Path<i64>, PathRejection>,
    ValueBody(value): ValueBody,
) -> Result<impl IntoResponse, ApiError> {
    let id = record_id(id)?;
    let changed = with_store(store, move |store| store.update_record(id, &value)).await?;
    debug!("Update of record {} changed {} rows", id, changed);
    Ok(Json(MessageResponse {
        message: "Data updated successfully",
    }))
}

/// DELETE /data/{id}
pub async fn delete_record(
    State(store): State<GuardedRecordStore>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = record_id(id)?;
    let removed = with_store(store, move |store| store.delete_record(id)).await?;
    debug!("Delete of record {} removed {} rows", id, removed);
    Ok(Json(MessageResponse {
        message: "Data deleted successfully",
    }))
}
