//! Process-local status store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tokio::sync::RwLock;

use crate::domain::entities::{StoredUrlSet, UrlSet};
use crate::domain::repositories::StatusStore;
use crate::error::AppError;

/// Keeps URL sets in memory with the same version semantics as
/// [`super::PgStatusStore`].
///
/// Used for local runs (`STATUS_STORE=memory`) and tests. Contents are lost
/// on restart.
#[derive(Default)]
pub struct InMemoryStatusStore {
    sets: RwLock<HashMap<String, StoredUrlSet>>,
}

impl InMemoryStatusStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatusStore for InMemoryStatusStore {
    async fn load(&self, business_id: &str) -> Result<StoredUrlSet, AppError> {
        let sets = self.sets.read().await;
        Ok(sets
            .get(business_id)
            .cloned()
            .unwrap_or_else(StoredUrlSet::empty))
    }

    async fn save(
        &self,
        business_id: &str,
        urls: &UrlSet,
        expected_version: i64,
    ) -> Result<i64, AppError> {
        let mut sets = self.sets.write().await;
        let current = sets.get(business_id).map_or(0, |stored| stored.version);

        if current != expected_version {
            return Err(AppError::conflict(
                "URL set was modified concurrently",
                json!({
                    "business_id": business_id,
                    "expected_version": expected_version,
                    "current_version": current,
                }),
            ));
        }

        let version = current + 1;
        sets.insert(
            business_id.to_string(),
            StoredUrlSet {
                urls: urls.clone(),
                version,
                updated_at: Some(Utc::now()),
            },
        );

        Ok(version)
    }

    async fn health_check(&self) -> bool {
        true
    }
}
