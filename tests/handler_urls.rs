mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use seo_urlgen::domain::entities::ServiceArea;
use seo_urlgen::infrastructure::http::HttpBusinessConfig;
use seo_urlgen::infrastructure::persistence::InMemoryStatusStore;
use seo_urlgen::infrastructure::static_config::StaticBusinessConfig;

fn ids(items: &Value) -> Vec<String> {
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_preview_counts_cities_states_and_keywords() {
    let queue = MockServer::start().await;
    let server = common::test_server(common::memory_catalog(common::acme_config(), &queue.uri()));

    let response = server.get("/api/businesses/acme/preview").await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["business_id"], "acme");
    assert_eq!(json["total_urls"], 4);
    assert_eq!(json["city_count"], 2);
    assert_eq!(json["state_count"], 2);
    assert_eq!(json["keyword_count"], 2);
}

#[tokio::test]
async fn test_generate_orders_areas_outer_keywords_inner() {
    let queue = MockServer::start().await;
    let server = common::test_server(common::memory_catalog(common::acme_config(), &queue.uri()));

    let response = server.post("/api/businesses/acme/urls/generate").await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(
        ids(&json["items"]),
        vec![
            "towson-dispensary",
            "towson-cbd-shop",
            "york-dispensary",
            "york-cbd-shop"
        ]
    );
    assert_eq!(json["items"][1]["path"], "/cbd-shop/towson-md");
    assert_eq!(json["items"][1]["status"], "generated");
    assert_eq!(json["summary"]["added"], 4);
    assert_eq!(json["version"], 1);
}

#[tokio::test]
async fn test_generate_twice_adds_nothing() {
    let queue = MockServer::start().await;
    let server = common::test_server(common::memory_catalog(common::acme_config(), &queue.uri()));

    let first = server.post("/api/businesses/acme/urls/generate").await;
    let second = server.post("/api/businesses/acme/urls/generate").await;

    second.assert_status_ok();
    let first = first.json::<Value>();
    let second = second.json::<Value>();
    assert_eq!(second["summary"]["added"], 0);
    assert_eq!(second["summary"]["retained"], 4);
    assert_eq!(second["version"], first["version"]);
    assert_eq!(ids(&second["items"]), ids(&first["items"]));
}

#[tokio::test]
async fn test_config_change_appends_and_keeps_stale_entries() {
    let queue = MockServer::start().await;
    let store = Arc::new(InMemoryStatusStore::new());

    let before = common::test_server(common::catalog(
        store.clone(),
        Arc::new(common::acme_config()),
        &queue.uri(),
    ));
    before
        .post("/api/businesses/acme/urls/generate")
        .await
        .assert_status_ok();

    // "cbd shop" dropped, "delivery" and Baltimore added.
    let changed = StaticBusinessConfig::new().with_business(
        common::BUSINESS,
        common::keywords(&["dispensary", "delivery"]),
        vec![
            ServiceArea::new("Towson", "MD"),
            ServiceArea::new("York", "PA"),
            ServiceArea::new("Baltimore", "MD"),
        ],
        None,
    );
    let after = common::test_server(common::catalog(store, Arc::new(changed), &queue.uri()));

    let response = after.post("/api/businesses/acme/urls/generate").await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(
        ids(&json["items"]),
        vec![
            "towson-dispensary",
            "towson-cbd-shop",
            "york-dispensary",
            "york-cbd-shop",
            "towson-delivery",
            "york-delivery",
            "baltimore-dispensary",
            "baltimore-delivery"
        ]
    );
    assert_eq!(json["summary"]["added"], 4);
    assert_eq!(json["summary"]["stale"], 2);
}

#[tokio::test]
async fn test_list_unknown_business_is_empty() {
    let queue = MockServer::start().await;
    let server = common::test_server(common::memory_catalog(common::acme_config(), &queue.uri()));

    let response = server.get(&common::urls_path("globex")).await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["items"], json!([]));
    assert_eq!(json["counts"]["total"], 0);
    assert_eq!(json["pagination"]["total_items"], 0);
}

#[tokio::test]
async fn test_list_pages_in_stored_order() {
    let queue = MockServer::start().await;
    let server = common::test_server(common::memory_catalog(common::acme_config(), &queue.uri()));
    server
        .post("/api/businesses/acme/urls/generate")
        .await
        .assert_status_ok();

    let response = server
        .get(&common::urls_path("acme"))
        .add_query_param("page", "2")
        .add_query_param("page_size", "3")
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(ids(&json["items"]), vec!["york-cbd-shop"]);
    assert_eq!(json["pagination"]["total_items"], 4);
    assert_eq!(json["pagination"]["total_pages"], 2);
    assert_eq!(json["counts"]["generated"], 4);
}

#[tokio::test]
async fn test_list_filters_by_status() {
    let queue = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(common::QUEUE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "batchId": "q-1" })))
        .mount(&queue)
        .await;
    let server = common::test_server(common::memory_catalog(common::acme_config(), &queue.uri()));
    server
        .post("/api/businesses/acme/urls/generate")
        .await
        .assert_status_ok();
    server
        .post("/api/businesses/acme/submissions")
        .json(&json!({ "ids": ["york-dispensary"] }))
        .await
        .assert_status_ok();

    let response = server
        .get(&common::urls_path("acme"))
        .add_query_param("status", "pending")
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(ids(&json["items"]), vec!["york-dispensary"]);
    assert_eq!(json["items"][0]["batch_id"], "q-1");
    assert_eq!(json["counts"]["pending"], 1);
    assert_eq!(json["counts"]["total"], 4);
}

#[tokio::test]
async fn test_list_rejects_page_zero() {
    let queue = MockServer::start().await;
    let server = common::test_server(common::memory_catalog(common::acme_config(), &queue.uri()));

    let response = server
        .get(&common::urls_path("acme"))
        .add_query_param("page", "0")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "validation_error");
    assert_eq!(json["error"]["stage"], "listing");
}

#[tokio::test]
async fn test_progress_counts_statuses() {
    let queue = MockServer::start().await;
    let server = common::test_server(common::memory_catalog(common::acme_config(), &queue.uri()));
    server
        .post("/api/businesses/acme/urls/generate")
        .await
        .assert_status_ok();

    let response = server.get("/api/businesses/acme/progress").await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["total"], 4);
    assert_eq!(json["generated"], 4);
    assert_eq!(json["pending"], 0);
    assert_eq!(json["error"], 0);
}

#[tokio::test]
async fn test_config_service_failure_aborts_generation() {
    let config_service = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&config_service)
        .await;
    let store = Arc::new(InMemoryStatusStore::new());
    let config = HttpBusinessConfig::new(reqwest::Client::new(), config_service.uri());
    let server = common::test_server(common::catalog(
        store,
        Arc::new(config),
        &config_service.uri(),
    ));

    let response = server.post("/api/businesses/acme/urls/generate").await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "upstream_error");
    assert_eq!(json["error"]["stage"], "generation");

    let listed = server.get(&common::urls_path("acme")).await.json::<Value>();
    assert_eq!(listed["counts"]["total"], 0);
}
