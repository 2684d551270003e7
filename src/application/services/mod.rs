//! Business logic services for the application layer.

pub mod batch_submitter;
pub mod business_locks;
pub mod catalog_service;

pub use batch_submitter::{BatchSubmitter, SubmissionOutcome, SubmissionResult, SubmitPolicy};
pub use business_locks::BusinessLocks;
pub use catalog_service::{
    CatalogSettings, FailureReport, GenerationReport, UrlCatalogService, WorkerFailure,
};
