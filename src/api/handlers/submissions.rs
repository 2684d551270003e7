//! Handler for submitting a selection to the content queue.

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::api::dto::submission::{SubmitRequest, SubmitResponse};
use crate::domain::entities::TargetSite;
use crate::error::{AppError, Stage};
use crate::state::AppState;

/// Sends the selected URLs to the content queue as one batch.
///
/// # Endpoint
///
/// `POST /api/businesses/{business_id}/submissions`
///
/// # Request Body
///
/// ```json
/// {
///   "ids": ["towson-dispensary", "towson-cbd-shop"],
///   "target_site": "https://shop.example.com"
/// }
/// ```
///
/// `target_site` is optional; the business's active website is used when it
/// is omitted.
///
/// # Response
///
/// ```json
/// { "business_id": "acme", "accepted_count": 2, "batch_id": "9f2c..." }
/// ```
///
/// # Errors
///
/// - 400 for an empty selection, unknown or already pending ids
/// - 422 when no target site is available
/// - 502 when the queue fails or rejects the batch
pub async fn submit_handler(
    State(state): State<AppState>,
    Path(business_id): Path<String>,
    Json(payload): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::from(e).at_stage(Stage::Submission))?;

    let target = payload
        .target_site
        .as_deref()
        .map(TargetSite::parse)
        .transpose()
        .map_err(|e| AppError::from(e).at_stage(Stage::Submission))?;

    let result = state
        .catalog_service
        .submit_selection(&business_id, &payload.ids, target)
        .await?;

    Ok(Json(SubmitResponse {
        business_id,
        accepted_count: result.accepted_count,
        batch_id: result.batch_id,
    }))
}
