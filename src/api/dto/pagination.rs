//! Pagination and filtering query parameters.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::domain::entities::UrlStatus;

const DEFAULT_PAGE_SIZE: u32 = 100;
const MAX_PAGE_SIZE: u32 = 1000;

/// Pagination query parameters.
///
/// Uses `serde_with` to parse page numbers from query strings as integers.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl PaginationParams {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Validates pagination parameters and converts them to a slice window.
    ///
    /// # Defaults
    ///
    /// - `page`: 1
    /// - `page_size`: 100
    ///
    /// # Validation
    ///
    /// - Page must be > 0
    /// - Page size must be between 1 and 1000
    ///
    /// # Returns
    ///
    /// `(offset, limit)` into the filtered list.
    pub fn validate_and_get_offset_limit(&self) -> Result<(usize, usize), String> {
        let page = self.page();
        let page_size = self.page_size();

        if page == 0 {
            return Err("Page must be greater than 0".to_string());
        }

        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(format!("Page size must be between 1 and {}", MAX_PAGE_SIZE));
        }

        let offset = (page as usize - 1) * page_size as usize;
        Ok((offset, page_size as usize))
    }
}

/// Query parameters of the URL list endpoint.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct UrlListQuery {
    #[serde(flatten)]
    pub pagination: PaginationParams,

    /// Only return URLs in this status (`generated`, `pending` or `error`).
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub status: Option<UrlStatus>,
}

/// Pagination metadata for responses.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: usize,
    pub total_pages: u32,
}

impl PaginationMeta {
    pub fn new(page: u32, page_size: u32, total_items: usize) -> Self {
        Self {
            page,
            page_size,
            total_items,
            total_pages: total_items.div_ceil(page_size.max(1) as usize) as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<u32>, page_size: Option<u32>) -> PaginationParams {
        PaginationParams { page, page_size }
    }

    #[test]
    fn test_defaults() {
        let (offset, limit) = params(None, None).validate_and_get_offset_limit().unwrap();
        assert_eq!(offset, 0);
        assert_eq!(limit, 100);
    }

    #[test]
    fn test_custom_page_and_size() {
        let (offset, limit) = params(Some(3), Some(50)).validate_and_get_offset_limit().unwrap();
        assert_eq!(offset, 100);
        assert_eq!(limit, 50);
    }

    #[test]
    fn test_page_zero_is_error() {
        assert!(params(Some(0), None).validate_and_get_offset_limit().is_err());
    }

    #[test]
    fn test_page_size_bounds() {
        assert!(params(None, Some(0)).validate_and_get_offset_limit().is_err());
        assert!(params(None, Some(1)).validate_and_get_offset_limit().is_ok());
        assert!(params(None, Some(1000)).validate_and_get_offset_limit().is_ok());
        assert!(params(None, Some(1001)).validate_and_get_offset_limit().is_err());
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(PaginationMeta::new(1, 10, 0).total_pages, 0);
        assert_eq!(PaginationMeta::new(1, 10, 10).total_pages, 1);
        assert_eq!(PaginationMeta::new(1, 10, 11).total_pages, 2);
    }

    #[test]
    fn test_status_filter_from_query_json() {
        let query: UrlListQuery =
            serde_json::from_str(r#"{"status":"pending","page":"2"}"#).unwrap();
        assert_eq!(query.status, Some(UrlStatus::Pending));
        assert_eq!(query.pagination.page, Some(2));

        assert!(serde_json::from_str::<UrlListQuery>(r#"{"status":"done"}"#).is_err());
    }
}
