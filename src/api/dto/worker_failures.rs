//! DTOs for worker failure intake.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::WorkerFailure;

/// Failures reported by the content worker for one business.
#[derive(Debug, Deserialize, Validate)]
pub struct WorkerFailuresRequest {
    #[validate(length(min = 1, message = "At least one failure is required"))]
    #[validate(nested)]
    pub failures: Vec<FailureItem>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct FailureItem {
    #[validate(length(min = 1, max = 512))]
    pub id: String,

    #[validate(length(min = 1, max = 4000))]
    pub error: String,
}

impl From<FailureItem> for WorkerFailure {
    fn from(item: FailureItem) -> Self {
        WorkerFailure {
            id: item.id,
            error: item.error,
        }
    }
}
