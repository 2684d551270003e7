#![allow(dead_code)]

use axum::Router;
use axum::routing::get;
use axum_test::TestServer;
use std::sync::Arc;
use std::time::Duration;

use seo_urlgen::api;
use seo_urlgen::api::handlers::health_handler;
use seo_urlgen::application::services::{
    BatchSubmitter, CatalogSettings, SubmitPolicy, UrlCatalogService,
};
use seo_urlgen::domain::entities::{Keyword, ServiceArea, TargetSite};
use seo_urlgen::domain::repositories::{BusinessConfigRepository, StatusStore};
use seo_urlgen::infrastructure::cache::NullCache;
use seo_urlgen::infrastructure::http::HttpContentQueue;
use seo_urlgen::infrastructure::persistence::InMemoryStatusStore;
use seo_urlgen::infrastructure::static_config::StaticBusinessConfig;
use seo_urlgen::state::AppState;

pub const BUSINESS: &str = "acme";
pub const QUEUE_PATH: &str = "/send-urls-to-queue";

pub fn keywords(items: &[&str]) -> Vec<Keyword> {
    items.iter().map(|k| Keyword::from(*k)).collect()
}

pub fn active_site() -> TargetSite {
    TargetSite::parse("https://shop.example.com").unwrap()
}

/// Two keywords in two areas of different states, with an active website.
pub fn acme_config() -> StaticBusinessConfig {
    StaticBusinessConfig::new().with_business(
        BUSINESS,
        keywords(&["dispensary", "cbd shop"]),
        vec![ServiceArea::new("Towson", "MD"), ServiceArea::new("York", "PA")],
        Some(active_site()),
    )
}

pub fn fast_policy() -> SubmitPolicy {
    SubmitPolicy {
        timeout: Duration::from_secs(2),
        max_retries: 1,
        backoff_base_ms: 1,
    }
}

/// Catalog over `store`, reading `config`, posting batches to `queue_base_url`.
pub fn catalog(
    store: Arc<dyn StatusStore>,
    config: Arc<dyn BusinessConfigRepository>,
    queue_base_url: &str,
) -> Arc<UrlCatalogService> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap();
    let queue = Arc::new(HttpContentQueue::new(
        client,
        format!("{}{}", queue_base_url, QUEUE_PATH),
    ));

    Arc::new(UrlCatalogService::new(
        store,
        config,
        BatchSubmitter::new(queue, fast_policy()),
        Arc::new(NullCache::new()),
        CatalogSettings::default(),
    ))
}

pub fn memory_catalog(config: StaticBusinessConfig, queue_base_url: &str) -> Arc<UrlCatalogService> {
    catalog(
        Arc::new(InMemoryStatusStore::new()),
        Arc::new(config),
        queue_base_url,
    )
}

/// Routes as mounted by the server, without rate limiting.
pub fn test_server(catalog: Arc<UrlCatalogService>) -> TestServer {
    let app = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api::routes::routes())
        .with_state(AppState::new(catalog));

    TestServer::new(app).unwrap()
}

pub fn urls_path(business_id: &str) -> String {
    format!("/api/businesses/{}/urls", business_id)
}
