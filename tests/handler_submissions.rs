mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use seo_urlgen::domain::entities::{Keyword, ServiceArea};
use seo_urlgen::infrastructure::static_config::StaticBusinessConfig;

const SUBMIT: &str = "/api/businesses/acme/submissions";

async fn generated_server(queue: &MockServer) -> TestServer {
    let server = common::test_server(common::memory_catalog(common::acme_config(), &queue.uri()));
    server
        .post("/api/businesses/acme/urls/generate")
        .await
        .assert_status_ok();
    server
}

async fn statuses(server: &TestServer) -> Vec<(String, String)> {
    let json = server.get(&common::urls_path("acme")).await.json::<Value>();
    json["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| {
            (
                item["id"].as_str().unwrap().to_string(),
                item["status"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

fn status_of<'a>(all: &'a [(String, String)], id: &str) -> &'a str {
    &all.iter().find(|(entry, _)| entry == id).unwrap().1
}

#[tokio::test]
async fn test_accepted_batch_marks_selection_pending() {
    let queue = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(common::QUEUE_PATH))
        .and(body_partial_json(json!({
            "businessId": "acme",
            "targetSite": "shop.example.com",
            "paths": ["/dispensary/towson-md", "/dispensary/york-pa"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "batchId": "q-42" })))
        .expect(1)
        .mount(&queue)
        .await;
    let server = generated_server(&queue).await;

    let response = server
        .post(SUBMIT)
        .json(&json!({ "ids": ["towson-dispensary", "york-dispensary"] }))
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["accepted_count"], 2);
    assert_eq!(json["batch_id"], "q-42");

    let all = statuses(&server).await;
    assert_eq!(status_of(&all, "towson-dispensary"), "pending");
    assert_eq!(status_of(&all, "york-dispensary"), "pending");
    assert_eq!(status_of(&all, "towson-cbd-shop"), "generated");
    assert_eq!(status_of(&all, "york-cbd-shop"), "generated");
}

#[tokio::test]
async fn test_explicit_target_overrides_active_website() {
    let queue = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(common::QUEUE_PATH))
        .and(body_partial_json(json!({ "targetSite": "other.example.org/blog" })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&queue)
        .await;
    let server = generated_server(&queue).await;

    let response = server
        .post(SUBMIT)
        .json(&json!({
            "ids": ["york-cbd-shop"],
            "target_site": "https://other.example.org/blog/"
        }))
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    // No id in the queue's answer: the idempotency key is used.
    assert_eq!(json["batch_id"].as_str().unwrap().len(), 32);
}

#[tokio::test]
async fn test_server_error_changes_nothing() {
    let queue = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(common::QUEUE_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&queue)
        .await;
    let server = generated_server(&queue).await;

    let response = server
        .post(SUBMIT)
        .json(&json!({ "ids": ["towson-dispensary"] }))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "upstream_error");
    assert_eq!(json["error"]["stage"], "submission");

    let all = statuses(&server).await;
    assert!(all.iter().all(|(_, status)| status == "generated"));
}

#[tokio::test]
async fn test_rate_limited_batch_is_resent_once_unchanged() {
    let queue = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(common::QUEUE_PATH))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&queue)
        .await;
    Mock::given(method("POST"))
        .and(path(common::QUEUE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "batchId": "q-7" })))
        .expect(1)
        .mount(&queue)
        .await;
    let server = generated_server(&queue).await;

    let response = server
        .post(SUBMIT)
        .json(&json!({ "ids": ["towson-cbd-shop"] }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["batch_id"], "q-7");

    let requests = queue.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].body, requests[1].body);
}

#[tokio::test]
async fn test_persistent_rate_limit_gives_up_after_one_retry() {
    let queue = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(common::QUEUE_PATH))
        .respond_with(ResponseTemplate::new(429))
        .expect(2)
        .mount(&queue)
        .await;
    let server = generated_server(&queue).await;

    let response = server
        .post(SUBMIT)
        .json(&json!({ "ids": ["towson-cbd-shop"] }))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let all = statuses(&server).await;
    assert_eq!(status_of(&all, "towson-cbd-shop"), "generated");
}

#[tokio::test]
async fn test_rejected_batch_marks_selection_error() {
    let queue = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(common::QUEUE_PATH))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "site not verified" })),
        )
        .expect(1)
        .mount(&queue)
        .await;
    let server = generated_server(&queue).await;

    let response = server
        .post(SUBMIT)
        .json(&json!({ "ids": ["york-dispensary"] }))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let json = response.json::<Value>();
    assert_eq!(json["error"]["details"]["reason"], "site not verified");

    let listed = server
        .get(&common::urls_path("acme"))
        .add_query_param("status", "error")
        .await
        .json::<Value>();
    assert_eq!(listed["items"][0]["id"], "york-dispensary");
    assert_eq!(listed["items"][0]["error"], "site not verified");
    assert_eq!(listed["counts"]["error"], 1);
}

#[tokio::test]
async fn test_unknown_ids_are_rejected_without_queue_call() {
    let queue = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&queue)
        .await;
    let server = generated_server(&queue).await;

    let response = server
        .post(SUBMIT)
        .json(&json!({ "ids": ["towson-dispensary", "denver-dispensary"] }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "validation_error");
    assert_eq!(json["error"]["details"]["unknown_ids"], json!(["denver-dispensary"]));
}

#[tokio::test]
async fn test_empty_selection_is_rejected() {
    let queue = MockServer::start().await;
    let server = generated_server(&queue).await;

    let response = server.post(SUBMIT).json(&json!({ "ids": [] })).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "validation_error");
    assert_eq!(json["error"]["stage"], "submission");
}

#[tokio::test]
async fn test_pending_urls_cannot_be_resubmitted() {
    let queue = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(common::QUEUE_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&queue)
        .await;
    let server = generated_server(&queue).await;
    let body = json!({ "ids": ["towson-dispensary"] });

    server.post(SUBMIT).json(&body).await.assert_status_ok();
    let response = server.post(SUBMIT).json(&body).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"]["details"]["pending_ids"],
        json!(["towson-dispensary"])
    );
}

#[tokio::test]
async fn test_missing_target_is_precondition_error() {
    let queue = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&queue)
        .await;
    let config = StaticBusinessConfig::new().with_business(
        common::BUSINESS,
        vec![Keyword::from("dispensary")],
        vec![ServiceArea::new("Towson", "MD")],
        None,
    );
    let server = common::test_server(common::memory_catalog(config, &queue.uri()));
    server
        .post("/api/businesses/acme/urls/generate")
        .await
        .assert_status_ok();

    let response = server
        .post(SUBMIT)
        .json(&json!({ "ids": ["towson-dispensary"] }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "precondition_error");
    assert_eq!(json["error"]["stage"], "submission");
}

#[tokio::test]
async fn test_invalid_target_site_is_validation_error() {
    let queue = MockServer::start().await;
    let server = generated_server(&queue).await;

    let response = server
        .post(SUBMIT)
        .json(&json!({ "ids": ["towson-dispensary"], "target_site": "https://" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_worker_failures_move_pending_to_error() {
    let queue = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(common::QUEUE_PATH))
        .respond_with(ResponseTemplate::new(200))
        .mount(&queue)
        .await;
    let server = generated_server(&queue).await;
    server
        .post(SUBMIT)
        .json(&json!({ "ids": ["towson-dispensary"] }))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/businesses/acme/worker-failures")
        .json(&json!({
            "failures": [
                { "id": "towson-dispensary", "error": "generation timed out" },
                { "id": "york-dispensary", "error": "not submitted" }
            ]
        }))
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["applied"], json!(["towson-dispensary"]));
    assert_eq!(json["ignored"], json!(["york-dispensary"]));

    let all = statuses(&server).await;
    assert_eq!(status_of(&all, "towson-dispensary"), "error");
    assert_eq!(status_of(&all, "york-dispensary"), "generated");
}

#[tokio::test]
async fn test_worker_failures_with_unknown_id_write_nothing() {
    let queue = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(common::QUEUE_PATH))
        .respond_with(ResponseTemplate::new(200))
        .mount(&queue)
        .await;
    let server = generated_server(&queue).await;
    server
        .post(SUBMIT)
        .json(&json!({ "ids": ["towson-dispensary"] }))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/businesses/acme/worker-failures")
        .json(&json!({
            "failures": [
                { "id": "towson-dispensary", "error": "boom" },
                { "id": "denver-dispensary", "error": "boom" }
            ]
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["stage"], "reconciliation");

    let all = statuses(&server).await;
    assert_eq!(status_of(&all, "towson-dispensary"), "pending");
}
