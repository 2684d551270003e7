//! API route configuration.
//!
//! Routes are split by cost so that [`crate::routes`] can apply a stricter
//! rate limit to the ones that call upstream services on every request.

use crate::api::handlers::{
    generate_handler, list_urls_handler, preview_handler, progress_handler, submit_handler,
    worker_failures_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Reads and worker callbacks.
///
/// # Endpoints
///
/// - `GET  /businesses/{business_id}/preview`         - Breakdown preview (cached)
/// - `GET  /businesses/{business_id}/urls`            - Stored URL set (filter + paging)
/// - `GET  /businesses/{business_id}/progress`        - Per-status counts
/// - `POST /businesses/{business_id}/worker-failures` - Failure intake from the content worker
pub fn query_routes() -> Router<AppState> {
    Router::new()
        .route("/businesses/{business_id}/preview", get(preview_handler))
        .route("/businesses/{business_id}/urls", get(list_urls_handler))
        .route("/businesses/{business_id}/progress", get(progress_handler))
        .route(
            "/businesses/{business_id}/worker-failures",
            post(worker_failures_handler),
        )
}

/// Operations that write the URL set after calling upstream services.
///
/// # Endpoints
///
/// - `POST /businesses/{business_id}/urls/generate` - Generate and reconcile
/// - `POST /businesses/{business_id}/submissions`   - Submit a selection to the queue
pub fn command_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/businesses/{business_id}/urls/generate",
            post(generate_handler),
        )
        .route("/businesses/{business_id}/submissions", post(submit_handler))
}

/// All API routes without rate limiting, for tests and embedding.
pub fn routes() -> Router<AppState> {
    query_routes().merge(command_routes())
}
