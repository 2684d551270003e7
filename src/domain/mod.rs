//! Domain layer: entities, pure engines and collaborator contracts.
//!
//! Nothing in here performs I/O. Storage, the configuration service and the
//! content queue are reached through the traits in [`repositories`].
//!
//! # Modules
//!
//! - [`entities`] - Core data structures
//! - [`url_generator`] - Cartesian product of areas and keywords
//! - [`reconciliation`] - Append-only merge into the persisted set
//! - [`repositories`] - Collaborator trait definitions
//!
//! # Generation Flow
//!
//! 1. Keywords and service areas are read from [`repositories::BusinessConfigRepository`]
//! 2. [`url_generator::generate_with_scheme`] renders candidates
//! 3. [`reconciliation::reconcile_with_summary`] merges them into the stored set
//! 4. The result is written through [`repositories::StatusStore`]

pub mod entities;
pub mod reconciliation;
pub mod repositories;
pub mod url_generator;
