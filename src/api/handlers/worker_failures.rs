//! Handler for failures reported by the content worker.

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::api::dto::worker_failures::WorkerFailuresRequest;
use crate::application::services::{FailureReport, WorkerFailure};
use crate::error::{AppError, Stage};
use crate::state::AppState;

/// Moves pending URLs named in the report to `error`.
///
/// # Endpoint
///
/// `POST /api/businesses/{business_id}/worker-failures`
///
/// # Request Body
///
/// ```json
/// { "failures": [{ "id": "towson-dispensary", "error": "generation timed out" }] }
/// ```
///
/// # Response
///
/// ```json
/// { "applied": ["towson-dispensary"], "ignored": [] }
/// ```
///
/// Ids that are known but not pending are listed under `ignored`.
///
/// # Errors
///
/// Returns 400 Bad Request if the report is empty or names unknown ids; in
/// that case nothing is written.
pub async fn worker_failures_handler(
    State(state): State<AppState>,
    Path(business_id): Path<String>,
    Json(payload): Json<WorkerFailuresRequest>,
) -> Result<Json<FailureReport>, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::from(e).at_stage(Stage::Reconciliation))?;

    let failures: Vec<WorkerFailure> = payload.failures.into_iter().map(Into::into).collect();

    let report = state
        .catalog_service
        .record_worker_failures(&business_id, &failures)
        .await?;

    Ok(Json(report))
}
