//! Approval service endpoints.
//!
//! - `POST /request` submits a plan and returns `201 {"id": ...}`
//! - `GET /status/:id` returns `{"id", "status", "approver"?}`
//! - `POST /callback/:id` with `{"approved", "approver"?}` resolves a request

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use cw_core::{CallbackRequest, StatusResponse, SubmissionRequest, SubmissionResponse};
use serde_json::{json, Value};
use tracing::instrument;
use uuid::Uuid;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/request", post(submit_request))
        .route("/status/:id", get(request_status))
        .route("/callback/:id", post(resolve_request))
        .route("/health", get(health_check))
        .with_state(state)
}

#[instrument(skip_all)]
async fn submit_request(
    State(state): State<AppState>,
    payload: Result<Json<SubmissionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    if request.account.trim().is_empty() {
        return Err(ApiError::BadRequest("account must not be empty".to_string()));
    }

    let record = state.store.create(request).await;
    if let Some(journal) = &state.journal {
        journal.record_submission(&record).await;
    }

    Ok((
        StatusCode::CREATED,
        Json(SubmissionResponse {
            id: Some(record.id.to_string()),
        }),
    ))
}

#[instrument(skip_all)]
async fn request_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    let id = parse_id(&id)?;
    let record = state.store.get(id).await?;

    Ok(Json(StatusResponse {
        id: Some(record.id.to_string()),
        status: record.status.to_string(),
        approver: record.approver,
    }))
}

#[instrument(skip_all)]
async fn resolve_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CallbackRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let id = parse_id(&id)?;
    let Json(callback) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let record = state
        .store
        .resolve(id, callback.approved, callback.approver)
        .await?;
    if let Some(journal) = &state.journal {
        journal.record_resolution(&record).await;
    }

    Ok(Json(StatusResponse {
        id: Some(record.id.to_string()),
        status: record.status.to_string(),
        approver: record.approver,
    }))
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "requests": state.store.len().await,
    }))
}

/// Ids that are not UUIDs cannot name a stored request.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw)
        .map_err(|_| ApiError::NotFound(format!("approval request {} not found", raw)))
}
