use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tracing::info;

use crate::db::{NewRecord, Record, RecordPatch};
use crate::middleware::JsonBody;
use crate::{RecordsError, router::RecordsState};

pub const RECORDS_PATH: &str = "/api/recordslist";

pub async fn list_records(
    State(state): State<RecordsState>,
) -> Result<Json<Vec<Record>>, RecordsError> {
    Ok(Json(state.store.list_all().await?))
}

pub async fn create_record(
    State(state): State<RecordsState>,
    JsonBody(body): JsonBody<NewRecord>,
) -> Result<Response, RecordsError> {
    let record = Record::try_from(body)?;
    let created = state.store.insert(record).await?;
    info!(id = %created.id, "record created");

    let location = HeaderValue::try_from(format!("{RECORDS_PATH}/{}", created.id)).ok();
    let mut resp = (StatusCode::CREATED, Json(created)).into_response();
    if let Some(location) = location {
        resp.headers_mut().insert(LOCATION, location);
    }
    Ok(resp)
}

pub async fn get_record(
    State(state): State<RecordsState>,
    Path(id): Path<String>,
) -> Result<Json<Record>, RecordsError> {
    Ok(Json(state.store.get_by_id(&id).await?))
}

pub async fn update_record(
    State(state): State<RecordsState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<RecordPatch>,
) -> Result<StatusCode, RecordsError> {
    // unknown ids are 404 whatever the body says
    state.store.get_by_id(&id).await?;
    patch.validate_for(&id)?;
    state.store.update_by_id(&id, patch).await?;
    info!(id = %id, "record updated");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_record(
    State(state): State<RecordsState>,
    Path(id): Path<String>,
) -> Result<StatusCode, RecordsError> {
    state.store.delete_by_id(&id).await?;
    info!(id = %id, "record deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Liveness plus a database round trip.
pub async fn health(State(state): State<RecordsState>) -> Result<Json<Value>, RecordsError> {
    state.store.ping().await?;
    Ok(Json(json!({ "status": "ok" })))
}
