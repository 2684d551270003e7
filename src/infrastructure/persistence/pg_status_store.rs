//! PostgreSQL implementation of the status store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use super::records::{UrlColumns, UrlRow};
use crate::domain::entities::{StoredUrlSet, UrlSet};
use crate::domain::repositories::StatusStore;
use crate::error::AppError;

/// PostgreSQL status store.
///
/// `url_sets` holds the version token per business, `generated_urls` the
/// entries with their position. A save bumps the version and replaces the
/// rows in one transaction, so readers never see a half-written set.
pub struct PgStatusStore {
    pool: Arc<PgPool>,
}

impl PgStatusStore {
    /// Creates a new store with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    fn conflict(business_id: &str, expected_version: i64) -> AppError {
        AppError::conflict(
            "URL set was modified concurrently",
            json!({ "business_id": business_id, "expected_version": expected_version }),
        )
    }
}

#[async_trait]
impl StatusStore for PgStatusStore {
    async fn load(&self, business_id: &str) -> Result<StoredUrlSet, AppError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let header: Option<(i64, DateTime<Utc>)> =
            sqlx::query_as("SELECT version, updated_at FROM url_sets WHERE business_id = $1")
                .bind(business_id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some((version, updated_at)) = header else {
            tx.commit().await?;
            return Ok(StoredUrlSet::empty());
        };

        let rows: Vec<UrlRow> = sqlx::query_as(
            r#"
            SELECT url_id, path, status, error, batch_id
            FROM generated_urls
            WHERE business_id = $1
            ORDER BY position
            "#,
        )
        .bind(business_id)
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(StoredUrlSet {
            urls: UrlSet::from_entries(rows.into_iter().map(UrlRow::into_generated_url)),
            version,
            updated_at: Some(updated_at),
        })
    }

    async fn save(
        &self,
        business_id: &str,
        urls: &UrlSet,
        expected_version: i64,
    ) -> Result<i64, AppError> {
        let columns = UrlColumns::from_urls(urls.iter())?;
        let mut tx = self.pool.begin().await?;

        let new_version: Option<i64> = if expected_version == 0 {
            sqlx::query_scalar(
                r#"
                INSERT INTO url_sets (business_id, version)
                VALUES ($1, 1)
                ON CONFLICT (business_id) DO NOTHING
                RETURNING version
                "#,
            )
            .bind(business_id)
            .fetch_optional(&mut *tx)
            .await?
        } else {
            sqlx::query_scalar(
                r#"
                UPDATE url_sets
                SET version = version + 1, updated_at = now()
                WHERE business_id = $1 AND version = $2
                RETURNING version
                "#,
            )
            .bind(business_id)
            .bind(expected_version)
            .fetch_optional(&mut *tx)
            .await?
        };

        let Some(new_version) = new_version else {
            tx.rollback().await?;
            return Err(Self::conflict(business_id, expected_version));
        };

        sqlx::query("DELETE FROM generated_urls WHERE business_id = $1")
            .bind(business_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO generated_urls (business_id, position, url_id, path, status, error, batch_id)
            SELECT $1, t.position, t.url_id, t.path, t.status, t.error, t.batch_id
            FROM UNNEST($2::int4[], $3::text[], $4::text[], $5::text[], $6::text[], $7::text[])
                AS t(position, url_id, path, status, error, batch_id)
            "#,
        )
        .bind(business_id)
        .bind(&columns.positions)
        .bind(&columns.ids)
        .bind(&columns.paths)
        .bind(&columns.statuses)
        .bind(&columns.errors)
        .bind(&columns.batch_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            business_id,
            version = new_version,
            count = urls.len(),
            "URL set saved"
        );

        Ok(new_version)
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
