//! Contract of the external content-generation queue.

use async_trait::async_trait;
use serde::Serialize;

/// One batch handed to the content-generation queue.
///
/// The same request value is resent on retry so the queue can deduplicate
/// by `batch_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueRequest {
    pub business_id: String,
    pub target_site: String,
    pub paths: Vec<String>,
    pub batch_id: String,
}

/// Acknowledgement of an accepted batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueReceipt {
    /// Batch id assigned by the queue, when it returns one.
    pub batch_id: Option<String>,
}

/// Reasons a batch was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    #[error("Content queue unreachable: {0}")]
    Network(String),

    #[error("Content queue did not answer in time")]
    Timeout,

    #[error("Content queue is rate limiting requests")]
    RateLimited,

    #[error("Content queue failed with status {status}")]
    Server { status: u16 },

    #[error("Content queue rejected the batch: {reason}")]
    Rejected { reason: String },
}

impl QueueError {
    /// Transport failures that are safe to retry with the same payload.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            QueueError::Network(_) | QueueError::Timeout | QueueError::RateLimited
        )
    }
}

/// Asynchronous content-generation worker intake.
///
/// # Implementations
///
/// - [`crate::infrastructure::http::HttpContentQueue`] - HTTP endpoint
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentQueue: Send + Sync {
    /// Enqueues a batch. Acceptance is per call, not per path.
    async fn enqueue(&self, request: &QueueRequest) -> Result<QueueReceipt, QueueError>;
}
