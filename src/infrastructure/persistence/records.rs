//! Row mapping between PostgreSQL and domain entities.

use serde_json::json;
use sqlx::FromRow;
use tracing::warn;

use crate::domain::entities::{GeneratedUrl, UrlStatus};
use crate::error::AppError;

/// One row of `generated_urls`.
#[derive(Debug, Clone, FromRow)]
pub struct UrlRow {
    pub url_id: String,
    pub path: String,
    pub status: String,
    pub error: Option<String>,
    pub batch_id: Option<String>,
}

impl UrlRow {
    /// Maps the row onto a [`GeneratedUrl`].
    ///
    /// A status the crate does not know degrades to `Error` carrying the raw
    /// value, so the entry stays visible and can be resubmitted.
    pub fn into_generated_url(self) -> GeneratedUrl {
        let (status, error) = match self.status.parse::<UrlStatus>() {
            Ok(status) => (status, self.error),
            Err(e) => {
                warn!(url_id = %self.url_id, status = %self.status, "Unrecognized stored status");
                (UrlStatus::Error, Some(e.to_string()))
            }
        };

        GeneratedUrl {
            id: self.url_id,
            path: self.path,
            status,
            error,
            batch_id: self.batch_id,
        }
    }
}

/// Column-wise view of a URL set, ready for `UNNEST` binding.
#[derive(Debug, Default)]
pub struct UrlColumns {
    pub positions: Vec<i32>,
    pub ids: Vec<String>,
    pub paths: Vec<String>,
    pub statuses: Vec<String>,
    pub errors: Vec<Option<String>>,
    pub batch_ids: Vec<Option<String>>,
}

impl UrlColumns {
    /// Splits URLs into columns, numbering them in iteration order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] when a position does not fit the
    /// `int4` column.
    pub fn from_urls<'a>(urls: impl IntoIterator<Item = &'a GeneratedUrl>) -> Result<Self, AppError> {
        let mut columns = UrlColumns::default();
        for (index, url) in urls.into_iter().enumerate() {
            columns.positions.push(position(index)?);
            columns.ids.push(url.id.clone());
            columns.paths.push(url.path.clone());
            columns.statuses.push(url.status.as_str().to_string());
            columns.errors.push(url.error.clone());
            columns.batch_ids.push(url.batch_id.clone());
        }
        Ok(columns)
    }
}

fn position(index: usize) -> Result<i32, AppError> {
    i32::try_from(index).map_err(|_| {
        AppError::validation(
            "URL set is too large to store",
            json!({ "position": index, "max_position": i32::MAX }),
        )
    })
}
