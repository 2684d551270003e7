//! Handlers for reading and generating a business's URL set.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::json;

use crate::api::dto::pagination::{PaginationMeta, UrlListQuery};
use crate::api::dto::urls::{GenerateResponse, PreviewResponse, ProgressResponse, UrlListResponse};
use crate::domain::entities::GeneratedUrl;
use crate::error::{AppError, Stage};
use crate::state::AppState;

/// Counts the URLs a generation run would produce.
///
/// # Endpoint
///
/// `GET /api/businesses/{business_id}/preview`
///
/// # Response
///
/// ```json
/// {
///   "business_id": "acme",
///   "total_urls": 2,
///   "city_count": 1,
///   "state_count": 1,
///   "keyword_count": 2
/// }
/// ```
///
/// # Errors
///
/// Returns 502 Bad Gateway if the configuration service fails.
pub async fn preview_handler(
    State(state): State<AppState>,
    Path(business_id): Path<String>,
) -> Result<Json<PreviewResponse>, AppError> {
    let breakdown = state.catalog_service.preview_breakdown(&business_id).await?;

    Ok(Json(PreviewResponse {
        business_id,
        breakdown,
    }))
}

/// Lists the stored URL set in insertion order.
///
/// # Endpoint
///
/// `GET /api/businesses/{business_id}/urls`
///
/// # Query Parameters
///
/// - `status` (optional): `generated`, `pending` or `error`
/// - `page` (optional): Page number (default: 1)
/// - `page_size` (optional): Items per page (default: 100, max: 1000)
///
/// A business that was never generated returns an empty list.
///
/// # Errors
///
/// Returns 400 Bad Request if pagination parameters are invalid.
pub async fn list_urls_handler(
    State(state): State<AppState>,
    Path(business_id): Path<String>,
    Query(query): Query<UrlListQuery>,
) -> Result<Json<UrlListResponse>, AppError> {
    let (offset, limit) = query
        .pagination
        .validate_and_get_offset_limit()
        .map_err(|e| AppError::validation(e, json!({})).at_stage(Stage::Listing))?;

    let urls = state.catalog_service.list_urls(&business_id).await?;
    let counts = urls.status_counts();

    let filtered: Vec<GeneratedUrl> = match query.status {
        Some(status) => urls.with_status(status).cloned().collect(),
        None => urls.into_entries(),
    };
    let total_items = filtered.len();
    let items = filtered.into_iter().skip(offset).take(limit).collect();

    Ok(Json(UrlListResponse {
        business_id,
        counts,
        pagination: PaginationMeta::new(
            query.pagination.page(),
            query.pagination.page_size(),
            total_items,
        ),
        items,
    }))
}

/// Reports how many URLs are in each status.
///
/// # Endpoint
///
/// `GET /api/businesses/{business_id}/progress`
pub async fn progress_handler(
    State(state): State<AppState>,
    Path(business_id): Path<String>,
) -> Result<Json<ProgressResponse>, AppError> {
    let counts = state.catalog_service.progress(&business_id).await?;

    Ok(Json(ProgressResponse {
        business_id,
        counts,
    }))
}

/// Generates candidates from current configuration and merges them into the
/// stored set.
///
/// # Endpoint
///
/// `POST /api/businesses/{business_id}/urls/generate`
///
/// Existing entries keep their position and status; new ids are appended.
/// Calling it again without configuration changes adds nothing.
///
/// # Errors
///
/// - 502 if the configuration service fails (`stage: generation`) or the
///   status store fails (`stage: reconciliation`)
/// - 409 if another writer changed the set concurrently
pub async fn generate_handler(
    State(state): State<AppState>,
    Path(business_id): Path<String>,
) -> Result<Json<GenerateResponse>, AppError> {
    let report = state
        .catalog_service
        .generate_and_reconcile(&business_id)
        .await?;

    Ok(Json(GenerateResponse::new(business_id, report)))
}
