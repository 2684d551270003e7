//! Collaborator contracts used by the domain and application layers.
//!
//! Traits are implemented in `crate::infrastructure`; mock implementations
//! are generated via `mockall` for unit tests.
//!
//! # Available Contracts
//!
//! - [`StatusStore`] - Persisted URL sets with version token
//! - [`BusinessConfigRepository`] - Keywords, service areas and active website
//! - [`ContentQueue`] - External content-generation queue

pub mod business_config_repository;
pub mod content_queue;
pub mod status_store;

pub use business_config_repository::BusinessConfigRepository;
pub use content_queue::{ContentQueue, QueueError, QueueReceipt, QueueRequest};
pub use status_store::StatusStore;

#[cfg(test)]
pub use business_config_repository::MockBusinessConfigRepository;
#[cfg(test)]
pub use content_queue::MockContentQueue;
#[cfg(test)]
pub use status_store::MockStatusStore;
