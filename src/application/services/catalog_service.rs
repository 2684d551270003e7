//! Catalog operations exposed to the HTTP API and the admin CLI.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use serde::Serialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::application::services::batch_submitter::{
    BatchSubmitter, SubmissionOutcome, SubmissionResult, validate_selection,
};
use crate::application::services::business_locks::BusinessLocks;
use crate::domain::entities::{
    Keyword, PathPattern, ServiceArea, StatusCounts, StoredUrlSet, TargetSite, UrlBreakdown,
    UrlSet,
};
use crate::domain::reconciliation::{
    FailureOutcome, ReconcileSummary, apply_worker_failures, reconcile_with_summary,
};
use crate::domain::repositories::{BusinessConfigRepository, StatusStore};
use crate::domain::url_generator::{IdScheme, colliding_ids, generate_with_scheme};
use crate::error::{AppError, Stage};
use crate::infrastructure::cache::CacheService;

/// Tunables of the catalog service.
#[derive(Debug, Clone)]
pub struct CatalogSettings {
    pub pattern: PathPattern,
    pub id_scheme: IdScheme,
    /// Applied to each status store call.
    pub store_timeout: Duration,
    /// `None` uses the cache's own default.
    pub preview_ttl: Option<usize>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            pattern: PathPattern::default(),
            id_scheme: IdScheme::default(),
            store_timeout: Duration::from_secs(10),
            preview_ttl: None,
        }
    }
}

/// Result of a generate-and-reconcile run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub breakdown: UrlBreakdown,
    pub summary: ReconcileSummary,
    /// Ids produced more than once in this run; only the first was kept.
    pub collisions: Vec<String>,
    pub version: i64,
    pub urls: UrlSet,
}

/// Result of recording worker failures.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FailureReport {
    pub applied: Vec<String>,
    /// Known ids that were not pending and therefore left unchanged.
    pub ignored: Vec<String>,
}

/// Failure reported by the content worker for one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerFailure {
    pub id: String,
    pub error: String,
}

/// Orchestrates generation, reconciliation and submission for businesses.
///
/// Mutating operations hold the business's lock for their whole
/// read-modify-write cycle and save with the version they loaded, so
/// concurrent calls for one business never lose an update. Nothing is
/// persisted when any step before the final save fails.
pub struct UrlCatalogService {
    store: Arc<dyn StatusStore>,
    config: Arc<dyn BusinessConfigRepository>,
    submitter: BatchSubmitter,
    cache: Arc<dyn CacheService>,
    locks: BusinessLocks,
    settings: CatalogSettings,
}

impl UrlCatalogService {
    pub fn new(
        store: Arc<dyn StatusStore>,
        config: Arc<dyn BusinessConfigRepository>,
        submitter: BatchSubmitter,
        cache: Arc<dyn CacheService>,
        settings: CatalogSettings,
    ) -> Self {
        Self {
            store,
            config,
            submitter,
            cache,
            locks: BusinessLocks::new(),
            settings,
        }
    }

    /// Counts what a generation run would produce.
    ///
    /// Served from the preview cache when possible.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a blank business id, otherwise
    /// configuration service errors tagged with [`Stage::Generation`].
    pub async fn preview_breakdown(&self, business_id: &str) -> Result<UrlBreakdown, AppError> {
        let business_id = require_business_id(business_id, Stage::Generation)?;

        if let Ok(Some(cached)) = self.cache.get_breakdown(business_id).await {
            return Ok(cached);
        }

        let (keywords, areas) = self.load_inputs(business_id).await?;
        let breakdown = UrlBreakdown::compute(&keywords, &areas);
        self.remember_breakdown(business_id, &breakdown).await;

        Ok(breakdown)
    }

    /// Returns the persisted URLs of a business in stored order.
    pub async fn list_urls(&self, business_id: &str) -> Result<UrlSet, AppError> {
        let business_id = require_business_id(business_id, Stage::Listing)?;
        Ok(self.load_set(business_id, Stage::Listing).await?.urls)
    }

    /// Per-status totals of the persisted URLs.
    pub async fn progress(&self, business_id: &str) -> Result<StatusCounts, AppError> {
        Ok(self.list_urls(business_id).await?.status_counts())
    }

    /// Generates candidates from current configuration, merges them into the
    /// stored set and persists the result.
    ///
    /// The store is only written when new URLs were added.
    ///
    /// # Errors
    ///
    /// - configuration failures tagged [`Stage::Generation`]
    /// - store failures, timeouts and version conflicts tagged
    ///   [`Stage::Reconciliation`]
    pub async fn generate_and_reconcile(
        &self,
        business_id: &str,
    ) -> Result<GenerationReport, AppError> {
        let business_id = require_business_id(business_id, Stage::Generation)?;
        let _guard = self.locks.acquire(business_id).await;

        let (keywords, areas) = self.load_inputs(business_id).await?;
        let candidates =
            generate_with_scheme(&self.settings.pattern, &keywords, &areas, self.settings.id_scheme);

        let collisions = colliding_ids(&candidates);
        if !collisions.is_empty() {
            warn!(
                business_id,
                count = collisions.len(),
                id_scheme = %self.settings.id_scheme,
                "Generated ids collide, keeping first occurrence"
            );
        }

        let stored = self.load_set(business_id, Stage::Reconciliation).await?;
        let (merged, summary) = reconcile_with_summary(&stored.urls, &candidates);

        let version = if summary.added > 0 {
            self.save_set(business_id, &merged, stored.version, Stage::Reconciliation)
                .await?
        } else {
            stored.version
        };

        counter!("urlgen_generated_total").increment(summary.added as u64);
        info!(
            business_id,
            added = summary.added,
            retained = summary.retained,
            stale = summary.stale,
            total = merged.len(),
            version,
            "URL set reconciled"
        );

        let breakdown = UrlBreakdown::compute(&keywords, &areas);
        self.remember_breakdown(business_id, &breakdown).await;

        Ok(GenerationReport {
            breakdown,
            summary,
            collisions,
            version,
            urls: merged,
        })
    }

    /// Submits selected URLs to the content queue and persists their new
    /// status.
    ///
    /// When `target` is `None` the business's active website is used.
    ///
    /// # Errors
    ///
    /// All errors are tagged [`Stage::Submission`]:
    /// - [`AppError::Validation`] for an empty selection, unknown or pending ids
    /// - [`AppError::Precondition`] when no target site is available
    /// - [`AppError::Upstream`] when the queue fails (nothing changes), when it
    ///   rejects the batch (selected URLs are persisted as `Error`) or when
    ///   the store cannot be read or written
    pub async fn submit_selection(
        &self,
        business_id: &str,
        ids: &[String],
        target: Option<TargetSite>,
    ) -> Result<SubmissionResult, AppError> {
        let business_id = require_business_id(business_id, Stage::Submission)?;
        let _guard = self.locks.acquire(business_id).await;

        let stored = self.load_set(business_id, Stage::Submission).await?;
        validate_selection(ids, &stored.urls)?;

        let target = match target {
            Some(target) => Some(target),
            None => self
                .config
                .get_active_target(business_id)
                .await
                .map_err(|e| e.at_stage(Stage::Submission))?,
        };

        let outcome = self
            .submitter
            .submit(business_id, ids, &stored.urls, target.as_ref())
            .await?;

        match outcome {
            SubmissionOutcome::Accepted { result, urls } => {
                if let Err(e) = self
                    .save_set(business_id, &urls, stored.version, Stage::Submission)
                    .await
                {
                    error!(
                        business_id,
                        batch_id = %result.batch_id,
                        error = %e,
                        "Queue accepted batch but status could not be persisted"
                    );
                    return Err(e
                        .with_detail("batch_id", json!(result.batch_id))
                        .with_detail("accepted_ids", json!(ids)));
                }
                Ok(result)
            }
            SubmissionOutcome::Rejected { reason, urls } => {
                self.save_set(business_id, &urls, stored.version, Stage::Submission)
                    .await?;
                Err(AppError::upstream(
                    "Content queue rejected the batch",
                    json!({ "reason": reason, "ids": ids }),
                )
                .at_stage(Stage::Submission))
            }
        }
    }

    /// Records failures reported out of band by the content worker.
    ///
    /// Pending URLs named in `failures` move to `Error`. Known URLs in other
    /// states are left alone and reported as ignored.
    ///
    /// # Errors
    ///
    /// [`AppError::Validation`] for an empty report or unknown ids (nothing is
    /// written); store errors. All tagged [`Stage::Reconciliation`].
    pub async fn record_worker_failures(
        &self,
        business_id: &str,
        failures: &[WorkerFailure],
    ) -> Result<FailureReport, AppError> {
        let business_id = require_business_id(business_id, Stage::Reconciliation)?;
        if failures.is_empty() {
            return Err(AppError::validation(
                "Failure report must not be empty",
                json!({ "business_id": business_id }),
            )
            .at_stage(Stage::Reconciliation));
        }

        let _guard = self.locks.acquire(business_id).await;
        let stored = self.load_set(business_id, Stage::Reconciliation).await?;

        let pairs: Vec<(String, String)> = failures
            .iter()
            .map(|f| (f.id.clone(), f.error.clone()))
            .collect();
        let (updated, FailureOutcome {
            applied,
            skipped,
            unknown,
        }) = apply_worker_failures(&stored.urls, &pairs);

        if !unknown.is_empty() {
            return Err(AppError::validation(
                "Failure report references unknown URL ids",
                json!({ "unknown_ids": unknown }),
            )
            .at_stage(Stage::Reconciliation));
        }

        if !applied.is_empty() {
            self.save_set(business_id, &updated, stored.version, Stage::Reconciliation)
                .await?;
        }

        info!(
            business_id,
            applied = applied.len(),
            ignored = skipped.len(),
            "Worker failures recorded"
        );

        Ok(FailureReport {
            applied,
            ignored: skipped,
        })
    }

    /// Reports `(store_ok, cache_ok)`.
    pub async fn health(&self) -> (bool, bool) {
        tokio::join!(self.store.health_check(), self.cache.health_check())
    }

    /// Reads keywords and service areas, dropping tokens that slug to nothing.
    async fn load_inputs(
        &self,
        business_id: &str,
    ) -> Result<(Vec<Keyword>, Vec<ServiceArea>), AppError> {
        let (keywords, areas) = tokio::try_join!(
            self.config.get_keywords(business_id),
            self.config.get_service_areas(business_id),
        )
        .map_err(|e| e.at_stage(Stage::Generation))?;

        let keyword_total = keywords.len();
        let area_total = areas.len();
        let keywords: Vec<Keyword> = keywords
            .into_iter()
            .filter(|k| !k.slug().is_empty())
            .collect();
        let areas: Vec<ServiceArea> = areas.into_iter().filter(|a| !a.is_blank()).collect();

        if keywords.len() < keyword_total || areas.len() < area_total {
            warn!(
                business_id,
                dropped_keywords = keyword_total - keywords.len(),
                dropped_areas = area_total - areas.len(),
                "Ignoring blank keywords or service areas"
            );
        }

        Ok((keywords, areas))
    }

    async fn load_set(&self, business_id: &str, stage: Stage) -> Result<StoredUrlSet, AppError> {
        self.with_store_timeout("load", business_id, self.store.load(business_id))
            .await
            .map_err(|e| e.at_stage(stage))
    }

    async fn save_set(
        &self,
        business_id: &str,
        urls: &UrlSet,
        expected_version: i64,
        stage: Stage,
    ) -> Result<i64, AppError> {
        self.with_store_timeout(
            "save",
            business_id,
            self.store.save(business_id, urls, expected_version),
        )
        .await
        .map_err(|e| e.at_stage(stage))
    }

    async fn with_store_timeout<T>(
        &self,
        operation: &'static str,
        business_id: &str,
        call: impl Future<Output = Result<T, AppError>>,
    ) -> Result<T, AppError> {
        tokio::time::timeout(self.settings.store_timeout, call)
            .await
            .map_err(|_| {
                AppError::upstream(
                    "Status store timed out",
                    json!({
                        "operation": operation,
                        "business_id": business_id,
                        "timeout_secs": self.settings.store_timeout.as_secs(),
                    }),
                )
            })?
    }

    async fn remember_breakdown(&self, business_id: &str, breakdown: &UrlBreakdown) {
        if let Err(e) = self
            .cache
            .set_breakdown(business_id, breakdown, self.settings.preview_ttl)
            .await
        {
            warn!(business_id, "Failed to cache preview: {}", e);
        }
    }
}

fn require_business_id(business_id: &str, stage: Stage) -> Result<&str, AppError> {
    let trimmed = business_id.trim();
    if trimmed.is_empty() {
        return Err(
            AppError::validation("Business id must not be empty", json!({})).at_stage(stage),
        );
    }
    Ok(trimmed)
}
