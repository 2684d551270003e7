//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use crate::domain::entities::UrlBreakdown;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, error, info, warn};

/// Redis cache for preview breakdowns.
///
/// Values are stored as JSON strings under `preview:<business_id>`. All
/// operations are fail-open: errors are logged but don't propagate to callers.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: usize,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis, validates the connection with a PING, and configures the default TTL.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `default_ttl_seconds` - TTL applied when [`CacheService::set_breakdown`]
    ///   is called with `ttl_seconds = None`; controlled via `PREVIEW_CACHE_TTL_SECONDS`
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self {
            client: manager,
            default_ttl: default_ttl_seconds as usize,
            key_prefix: "preview:".to_string(),
        })
    }

    fn build_key(&self, business_id: &str) -> String {
        format!("{}{}", self.key_prefix, business_id)
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_breakdown(&self, business_id: &str) -> CacheResult<Option<UrlBreakdown>> {
        let key = self.build_key(business_id);
        let mut conn = self.client.clone();

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<UrlBreakdown>(&raw) {
                Ok(breakdown) => {
                    debug!(business_id, "Preview cache HIT");
                    Ok(Some(breakdown))
                }
                Err(e) => {
                    warn!(business_id, "Discarding unreadable cached preview: {}", e);
                    Ok(None)
                }
            },
            Ok(None) => {
                debug!(business_id, "Preview cache MISS");
                Ok(None)
            }
            Err(e) => {
                error!("Redis GET error for {}: {}", business_id, e);
                Ok(None)
            }
        }
    }

    async fn set_breakdown(
        &self,
        business_id: &str,
        breakdown: &UrlBreakdown,
        ttl: Option<usize>,
    ) -> CacheResult<()> {
        let key = self.build_key(business_id);
        let mut conn = self.client.clone();
        let ttl_seconds = ttl.unwrap_or(self.default_ttl);

        let payload = serde_json::to_string(breakdown)
            .map_err(|e| CacheError::OperationError(e.to_string()))?;

        match conn
            .set_ex::<_, _, ()>(&key, payload, ttl_seconds as u64)
            .await
        {
            Ok(_) => {
                debug!(
                    business_id,
                    total_urls = breakdown.total_urls,
                    "Preview cache SET (TTL: {}s)",
                    ttl_seconds
                );
                Ok(())
            }
            Err(e) => {
                warn!("Redis SET error for {}: {}", business_id, e);
                Ok(())
            }
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
