mod common;

use axum::http::StatusCode;
use common::{response_json, TestApp};
use serde_json::json;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

#[tokio::test]
async fn ping_and_status_are_public() {
    let app = TestApp::spawn().await;

    let response = app.get("/api/ping", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], "ok");

    let response = app.get("/api/status", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["service"], "orbit-api");
    assert!(body["version"].as_str().is_some());
}

#[tokio::test]
async fn health_reports_database_connectivity() {
    let app = TestApp::spawn().await;

    let response = app.get("/api/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn predict_health_proxies_the_python_service() {
    let python = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "ok", "model": "loaded" })),
        )
        .mount(&python)
        .await;

    let uri = python.uri();
    let app = TestApp::spawn_with(move |cfg| cfg.python_api_url = uri).await;

    let response = app.get("/api/predict/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["python_api"]["model"], "loaded");
}

#[tokio::test]
async fn unreachable_prediction_service_maps_to_503() {
    // Point at a port nothing listens on
    let app = TestApp::spawn_with(|cfg| {
        cfg.python_api_url = "http://127.0.0.1:9".to_string();
    })
    .await;

    let response = app.get("/api/predict/health", None).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = response_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn responses_carry_a_request_id_header() {
    let app = TestApp::spawn().await;

    let response = app.get("/api/ping", None).await;
    assert!(response.headers().get("x-request-id").is_some());
}
