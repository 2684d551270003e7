//! Submission of selected URLs to the content-generation queue.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use metrics::counter;
use serde::Serialize;
use serde_json::json;
use sha2::{Digest, Sha256};
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{info, warn};

use crate::domain::entities::{GeneratedUrl, TargetSite, UrlSet};
use crate::domain::repositories::{ContentQueue, QueueError, QueueReceipt, QueueRequest};
use crate::error::{AppError, Stage};

/// Upper bound on automatic resubmissions of one batch.
pub const MAX_QUEUE_RETRIES: usize = 1;

/// Timeout and retry settings for queue calls.
#[derive(Debug, Clone, Copy)]
pub struct SubmitPolicy {
    /// Applied to every attempt separately.
    pub timeout: Duration,
    /// Clamped to [`MAX_QUEUE_RETRIES`].
    pub max_retries: usize,
    pub backoff_base_ms: u64,
}

impl Default for SubmitPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: MAX_QUEUE_RETRIES,
            backoff_base_ms: 500,
        }
    }
}

/// What the caller is told about an accepted batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionResult {
    pub accepted_count: usize,
    pub batch_id: String,
}

/// Outcome of a submission that reached the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The queue took the batch; selected entries are `Pending`.
    Accepted {
        result: SubmissionResult,
        urls: UrlSet,
    },
    /// The queue refused the batch; selected entries are `Error`.
    Rejected { reason: String, urls: UrlSet },
}

/// Packages a selection into one queue request and applies the answer.
///
/// The submitter never persists anything. It returns the updated set and
/// leaves the write to the caller, which holds the per-business lock.
pub struct BatchSubmitter {
    queue: Arc<dyn ContentQueue>,
    policy: SubmitPolicy,
}

impl BatchSubmitter {
    pub fn new(queue: Arc<dyn ContentQueue>, policy: SubmitPolicy) -> Self {
        Self { queue, policy }
    }

    /// Submits `selection` from `urls` for `target`.
    ///
    /// Checks run before any network call, in this order: the selection is
    /// non-empty, every id exists, no id is already `Pending`, and a target
    /// is present. Repeated ids are submitted once.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for an empty selection, unknown ids or
    ///   ids that are already pending
    /// - [`AppError::Precondition`] when `target` is `None`
    /// - [`AppError::Upstream`] when the queue cannot be reached, times out,
    ///   keeps rate limiting or fails with a server error; `urls` is not
    ///   changed in that case
    pub async fn submit(
        &self,
        business_id: &str,
        selection: &[String],
        urls: &UrlSet,
        target: Option<&TargetSite>,
    ) -> Result<SubmissionOutcome, AppError> {
        let selected = validate_selection(selection, urls)?;

        let target = target.ok_or_else(|| {
            AppError::precondition(
                "No active target site configured",
                json!({ "business_id": business_id }),
            )
            .at_stage(Stage::Submission)
        })?;

        let paths: Vec<String> = selected
            .iter()
            .filter_map(|id| urls.get(id))
            .map(|entry| entry.path.clone())
            .collect();

        // Fixed before the first attempt so a retry resends the same key.
        let issued_at = Utc::now();
        let request = QueueRequest {
            business_id: business_id.to_string(),
            target_site: target.as_str().to_string(),
            batch_id: batch_key(business_id, target.as_str(), &paths, issued_at),
            paths,
        };

        match self.enqueue_with_retry(&request).await {
            Ok(receipt) => {
                let batch_id = receipt.batch_id.unwrap_or_else(|| request.batch_id.clone());
                let updated = mark_selected(urls, &selected, |entry| entry.mark_pending(&batch_id));

                counter!("urlgen_submissions_total", "outcome" => "accepted").increment(1);
                counter!("urlgen_submitted_urls_total").increment(selected.len() as u64);
                info!(
                    business_id,
                    batch_id = %batch_id,
                    count = selected.len(),
                    target = %target,
                    "Batch accepted by content queue"
                );

                Ok(SubmissionOutcome::Accepted {
                    result: SubmissionResult {
                        accepted_count: selected.len(),
                        batch_id,
                    },
                    urls: updated,
                })
            }
            Err(QueueError::Rejected { reason }) => {
                let updated = mark_selected(urls, &selected, |entry| entry.mark_error(&reason));

                counter!("urlgen_submissions_total", "outcome" => "rejected").increment(1);
                warn!(
                    business_id,
                    batch_id = %request.batch_id,
                    count = selected.len(),
                    reason = %reason,
                    "Batch rejected by content queue"
                );

                Ok(SubmissionOutcome::Rejected {
                    reason,
                    urls: updated,
                })
            }
            Err(e) => {
                counter!("urlgen_submissions_total", "outcome" => "failed").increment(1);
                warn!(
                    business_id,
                    batch_id = %request.batch_id,
                    error = %e,
                    "Batch submission failed, no URL changed"
                );

                Err(AppError::upstream(
                    "Content queue submission failed",
                    json!({
                        "reason": e.to_string(),
                        "batch_id": request.batch_id,
                        "retriable": e.is_retriable(),
                    }),
                )
                .at_stage(Stage::Submission))
            }
        }
    }

    async fn enqueue_with_retry(&self, request: &QueueRequest) -> Result<QueueReceipt, QueueError> {
        let retries = self.policy.max_retries.min(MAX_QUEUE_RETRIES);
        let strategy = ExponentialBackoff::from_millis(self.policy.backoff_base_ms.max(1))
            .map(jitter)
            .take(retries);
        let timeout = self.policy.timeout;

        RetryIf::spawn(
            strategy,
            move || async move {
                match tokio::time::timeout(timeout, self.queue.enqueue(request)).await {
                    Ok(result) => result,
                    Err(_) => Err(QueueError::Timeout),
                }
            },
            |e: &QueueError| {
                let retry = e.is_retriable();
                if retry {
                    warn!(batch_id = %request.batch_id, error = %e, "Retrying batch submission");
                }
                retry
            },
        )
        .await
    }
}

/// Idempotency key of one submission.
///
/// `issued_at` separates later resubmissions of the same paths from each
/// other; the same inputs always give the same key.
pub fn batch_key(
    business_id: &str,
    target_site: &str,
    paths: &[String],
    issued_at: DateTime<Utc>,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(business_id.as_bytes());
    hasher.update(b"\n");
    hasher.update(target_site.as_bytes());
    hasher.update(b"\n");
    hasher.update(issued_at.timestamp_nanos_opt().unwrap_or_default().to_be_bytes());
    for path in paths {
        hasher.update(b"\n");
        hasher.update(path.as_bytes());
    }
    let mut key = hex::encode(hasher.finalize());
    key.truncate(32);
    key
}

pub(crate) fn validate_selection(selection: &[String], urls: &UrlSet) -> Result<Vec<String>, AppError> {
    if selection.is_empty() {
        return Err(
            AppError::validation("Selection must not be empty", json!({}))
                .at_stage(Stage::Submission),
        );
    }

    let mut seen = HashSet::new();
    let selected: Vec<String> = selection
        .iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect();

    let unknown: Vec<&String> = selected.iter().filter(|id| !urls.contains(id)).collect();
    if !unknown.is_empty() {
        return Err(AppError::validation(
            "Selection references unknown URL ids",
            json!({ "unknown_ids": unknown }),
        )
        .at_stage(Stage::Submission));
    }

    let pending: Vec<&String> = selected
        .iter()
        .filter(|id| {
            urls.get(id)
                .is_some_and(|entry| !entry.is_submittable())
        })
        .collect();
    if !pending.is_empty() {
        return Err(AppError::validation(
            "Selection contains URLs that are already pending",
            json!({ "pending_ids": pending }),
        )
        .at_stage(Stage::Submission));
    }

    Ok(selected)
}

fn mark_selected(
    urls: &UrlSet,
    selected: &[String],
    mut apply: impl FnMut(&mut GeneratedUrl),
) -> UrlSet {
    let ids: HashSet<&str> = selected.iter().map(String::as_str).collect();
    let mut updated = urls.clone();
    for entry in updated.iter_mut() {
        if ids.contains(entry.id.as_str()) {
            apply(entry);
        }
    }
    updated
}
