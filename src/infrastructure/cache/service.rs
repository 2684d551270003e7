//! Cache service trait and error types.

use async_trait::async_trait;
use std::fmt;

use crate::domain::entities::UrlBreakdown;

/// Errors that can occur during cache operations.
#[derive(Debug)]
pub enum CacheError {
    ConnectionError(String),
    OperationError(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ConnectionError(e) => write!(f, "Cache connection error: {}", e),
            Self::OperationError(e) => write!(f, "Cache operation error: {}", e),
        }
    }
}

impl std::error::Error for CacheError {}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Trait for caching preview breakdowns per business.
///
/// Implementations must be thread-safe and fail open: a broken cache only
/// means the breakdown is recomputed from the configuration service.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns the cached breakdown of a business.
    ///
    /// `Ok(None)` on miss, on error and on an entry that no longer parses.
    async fn get_breakdown(&self, business_id: &str) -> CacheResult<Option<UrlBreakdown>>;

    /// Stores a breakdown, using the implementation default TTL when
    /// `ttl_seconds` is `None`.
    async fn set_breakdown(
        &self,
        business_id: &str,
        breakdown: &UrlBreakdown,
        ttl_seconds: Option<usize>,
    ) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    ///
    /// Used by the health endpoint to report cache status.
    async fn health_check(&self) -> bool;
}
