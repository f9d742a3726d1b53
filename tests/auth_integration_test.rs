mod common;

use axum::http::StatusCode;
use common::{response_json, TestApp, TEST_JWT_SECRET};
use jsonwebtoken::{encode, EncodingKey, Header};
use orbit_api::auth::{Claims, Role};
use serde_json::json;

#[tokio::test]
async fn register_then_duplicate_email_conflicts() {
    let app = TestApp::spawn().await;

    let payload = json!({
        "email": "pat@test.local",
        "password": "a-strong-password",
        "name": "Pat",
        "role": "manager",
    });

    let response = app.post("/api/auth/register", None, payload.clone()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["data"]["email"], "pat@test.local");
    // The hash must never leave the server
    assert!(body["data"].get("password_hash").is_none());

    let response = app.post("/api/auth/register", None, payload).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn login_requires_matching_role() {
    let app = TestApp::spawn().await;

    let response = app
        .post(
            "/api/auth/register",
            None,
            json!({
                "email": "sam@test.local",
                "password": "a-strong-password",
                "name": "Sam",
                "role": "analyst",
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Correct password but the wrong role is still rejected
    let response = app
        .post(
            "/api/auth/login",
            None,
            json!({
                "email": "sam@test.local",
                "password": "a-strong-password",
                "role": "admin",
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .post(
            "/api/auth/login",
            None,
            json!({
                "email": "sam@test.local",
                "password": "a-strong-password",
                "role": "analyst",
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert!(body["data"]["token"].as_str().is_some());
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = TestApp::spawn().await;

    app.post(
        "/api/auth/register",
        None,
        json!({
            "email": "kim@test.local",
            "password": "a-strong-password",
            "name": "Kim",
            "role": "manager",
        }),
    )
    .await;

    let response = app
        .post(
            "/api/auth/login",
            None,
            json!({
                "email": "kim@test.local",
                "password": "not-the-password",
                "role": "manager",
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn gated_routes_reject_missing_and_expired_tokens() {
    let app = TestApp::spawn().await;

    let response = app.get("/api/suppliers", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Expired well past the validation leeway
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: "1".to_string(),
        email: "old@test.local".to_string(),
        role: "admin".to_string(),
        iat: now - 90_000,
        exp: now - 7_200,
    };
    let expired = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap();

    let response = app.get("/api/suppliers", Some(&expired)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn role_gates_return_forbidden_for_valid_tokens() {
    let app = TestApp::spawn().await;
    let analyst = app.token_for(Role::Analyst).await;
    let admin = app.token_for(Role::Admin).await;

    // Product list is restricted to managers and admins
    let response = app.get("/api/products", Some(&analyst)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // User administration is admin-only
    let response = app.get("/api/users", Some(&analyst)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.get("/api/users", Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn analysts_can_use_the_rest_of_the_api() {
    let app = TestApp::spawn().await;
    let analyst = app.token_for(Role::Analyst).await;

    let response = app.get("/api/suppliers", Some(&analyst)).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Product search is open to any authenticated user even though the
    // list endpoint is not
    let response = app.get("/api/products/search?q=bearing", Some(&analyst)).await;
    assert_eq!(response.status(), StatusCode::OK);
}
