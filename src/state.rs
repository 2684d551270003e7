//! Shared application state injected into HTTP handlers.

use std::sync::Arc;

use crate::application::services::UrlCatalogService;

/// State cloned into every handler.
///
/// Holds the catalog service only; the store, cache and upstream clients
/// live behind it.
#[derive(Clone)]
pub struct AppState {
    pub catalog_service: Arc<UrlCatalogService>,
}

impl AppState {
    pub fn new(catalog_service: Arc<UrlCatalogService>) -> Self {
        Self { catalog_service }
    }
}
