//! DTOs for URL catalog reads and generation.

use serde::Serialize;

use super::pagination::PaginationMeta;
use crate::application::services::GenerationReport;
use crate::domain::entities::{GeneratedUrl, StatusCounts, UrlBreakdown};
use crate::domain::reconciliation::ReconcileSummary;

/// Page of a business's URL set, in stored order.
#[derive(Debug, Serialize)]
pub struct UrlListResponse {
    pub business_id: String,
    /// Totals over the whole set, not just this page.
    pub counts: StatusCounts,
    pub pagination: PaginationMeta,
    pub items: Vec<GeneratedUrl>,
}

/// Preview counters for a business.
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub business_id: String,
    #[serde(flatten)]
    pub breakdown: UrlBreakdown,
}

/// Per-status progress for a business.
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub business_id: String,
    #[serde(flatten)]
    pub counts: StatusCounts,
}

/// Outcome of a generate-and-reconcile run, including the full set.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub business_id: String,
    pub breakdown: UrlBreakdown,
    pub summary: ReconcileSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub collisions: Vec<String>,
    pub version: i64,
    pub items: Vec<GeneratedUrl>,
}

impl GenerateResponse {
    pub fn new(business_id: String, report: GenerationReport) -> Self {
        Self {
            business_id,
            breakdown: report.breakdown,
            summary: report.summary,
            collisions: report.collisions,
            version: report.version,
            items: report.urls.into_entries(),
        }
    }
}
