//! Application layer services implementing business logic.
//!
//! Services coordinate the pure domain engines with the collaborator traits
//! and own the consistency rules: per-business locking, store timeouts and
//! stage tagging of errors.
//!
//! # Available Services
//!
//! - [`services::catalog_service::UrlCatalogService`] - Preview, listing, generation and submission
//! - [`services::batch_submitter::BatchSubmitter`] - Queue submission with retry
//! - [`services::business_locks::BusinessLocks`] - Per-business serialization

pub mod services;
