mod common;

use axum::http::StatusCode;
use common::{response_json, TestApp};
use orbit_api::auth::Role;
use serde_json::json;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

fn groq_reply(text: &str) -> serde_json::Value {
    json!({ "choices": [{ "message": { "role": "assistant", "content": text } }] })
}

fn gemini_reply(text: &str) -> serde_json::Value {
    json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
}

async fn app_with_providers(groq: &MockServer, gemini: &MockServer) -> TestApp {
    let groq_uri = groq.uri();
    let gemini_uri = gemini.uri();
    TestApp::spawn_with(move |cfg| {
        cfg.groq_api_key = Some("test-groq-key".to_string());
        cfg.groq_base_url = groq_uri;
        cfg.gemini_api_key = Some("test-gemini-key".to_string());
        cfg.gemini_base_url = gemini_uri;
        cfg.insights_timeout_secs = 5;
    })
    .await
}

#[tokio::test]
async fn failing_first_provider_falls_through_to_the_second() {
    let groq = MockServer::start().await;
    let gemini = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&groq)
        .await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("Stock looks fine.")))
        .mount(&gemini)
        .await;

    let app = app_with_providers(&groq, &gemini).await;
    let token = app.token_for(Role::Manager).await;

    let response = app
        .post("/api/chat", Some(&token), json!({ "message": "How is stock?" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Stock looks fine.");
    assert_eq!(body["source"], "gemini");
}

#[tokio::test]
async fn first_provider_success_short_circuits() {
    let groq = MockServer::start().await;
    let gemini = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(groq_reply("All good.")))
        .mount(&groq)
        .await;

    let app = app_with_providers(&groq, &gemini).await;
    let token = app.token_for(Role::Admin).await;

    let response = app
        .post("/api/chat", Some(&token), json!({ "message": "Status?" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["source"], "groq");

    assert!(gemini.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn non_json_insights_reply_is_a_client_visible_error() {
    let groq = MockServer::start().await;
    let gemini = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(groq_reply("I cannot produce JSON today.")),
        )
        .mount(&groq)
        .await;

    let app = app_with_providers(&groq, &gemini).await;
    let token = app.token_for(Role::Manager).await;

    let response = app
        .post(
            "/api/insights/generate",
            Some(&token),
            json!({ "prompt": "Summarize inventory risk" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["details"], "I cannot produce JSON today.");
}

#[tokio::test]
async fn fenced_json_insights_reply_is_parsed() {
    let groq = MockServer::start().await;
    let gemini = MockServer::start().await;

    let fenced = "```json\n{\"risks\":[{\"title\":\"Single supplier\"}]}\n```";
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(groq_reply(fenced)))
        .mount(&groq)
        .await;

    let app = app_with_providers(&groq, &gemini).await;
    let token = app.token_for(Role::Manager).await;

    let response = app
        .post(
            "/api/insights/generate",
            Some(&token),
            json!({ "prompt": "Summarize inventory risk" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["is_ai_generated"], true);
    assert_eq!(body["source"], "groq");
    assert_eq!(body["data"]["risks"][0]["title"], "Single supplier");
    assert_eq!(body["data"]["investments"], json!([]));
}

#[tokio::test]
async fn all_providers_failing_yields_the_canned_set() {
    let groq = MockServer::start().await;
    let gemini = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&groq)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&gemini)
        .await;

    let app = app_with_providers(&groq, &gemini).await;
    let token = app.token_for(Role::Manager).await;

    let response = app
        .post(
            "/api/insights/generate",
            Some(&token),
            json!({ "prompt": "Summarize inventory risk" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["source"], "fallback");
    assert_eq!(body["is_ai_generated"], false);
    assert!(!body["data"]["risks"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn blank_chat_message_is_rejected() {
    let app = TestApp::spawn().await;
    let token = app.token_for(Role::Manager).await;

    let response = app
        .post("/api/chat", Some(&token), json!({ "message": "   " }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn public_chat_needs_no_token() {
    let groq = MockServer::start().await;
    let gemini = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(groq_reply("Hello!")))
        .mount(&groq)
        .await;

    let app = app_with_providers(&groq, &gemini).await;

    let response = app
        .post("/api/chat/public", None, json!({ "message": "Hi" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // The gated chat endpoint still requires a manager or admin token
    let response = app.post("/api/chat", None, json!({ "message": "Hi" })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let analyst = app.token_for(Role::Analyst).await;
    let response = app
        .post("/api/chat", Some(&analyst), json!({ "message": "Hi" }))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
