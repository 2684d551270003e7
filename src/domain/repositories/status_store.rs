//! Persistence contract for per-business URL sets.

use crate::domain::entities::{StoredUrlSet, UrlSet};
use crate::error::AppError;
use async_trait::async_trait;

/// Durable record of every URL known for a business.
///
/// Writes use optimistic concurrency: [`StatusStore::save`] takes the version
/// returned by the preceding [`StatusStore::load`] and fails with
/// [`AppError::Conflict`] if another writer got there first. Version `0`
/// means the business has never been saved.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgStatusStore`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryStatusStore`] - Process-local store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Loads the URL set of a business.
    ///
    /// Returns an empty set with version `0` for a business without history.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Upstream`] when the backend fails and
    /// [`AppError::PartialData`] when stored records cannot be mapped at all.
    async fn load(&self, business_id: &str) -> Result<StoredUrlSet, AppError>;

    /// Replaces the stored set if its version still equals `expected_version`.
    ///
    /// Returns the new version.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] on a version mismatch (nothing is
    /// written) and [`AppError::Upstream`] when the backend fails.
    async fn save(
        &self,
        business_id: &str,
        urls: &UrlSet,
        expected_version: i64,
    ) -> Result<i64, AppError>;

    /// Checks whether the backend is reachable.
    async fn health_check(&self) -> bool;
}
