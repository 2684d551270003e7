//! Status store implementations.
//!
//! # Stores
//!
//! - [`PgStatusStore`] - PostgreSQL, version token in `url_sets`
//! - [`InMemoryStatusStore`] - Process-local, for local runs and tests
//!
//! [`records`] maps database rows onto domain entities; nothing outside this
//! module sees the storage representation.

pub mod memory_status_store;
pub mod pg_status_store;
pub mod records;

pub use memory_status_store::InMemoryStatusStore;
pub use pg_status_store::PgStatusStore;
