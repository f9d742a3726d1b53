mod common;

use axum::http::StatusCode;
use common::{response_json, TestApp};
use orbit_api::auth::Role;
use serde_json::json;

async fn create_product(app: &TestApp, token: &str, sku: &str) -> i64 {
    let response = app
        .post(
            "/api/products",
            Some(token),
            json!({
                "sku": sku,
                "name": format!("Product {}", sku),
                "unit_price": "10.00",
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    body["data"]["id"].as_i64().expect("id should be set")
}

#[tokio::test]
async fn update_computes_available_and_upserts() {
    let app = TestApp::spawn().await;
    let token = app.token_for(Role::Manager).await;
    let product_id = create_product(&app, &token, "BRG-1").await;

    let response = app
        .post(
            "/api/inventory/update",
            Some(&token),
            json!({ "product_id": product_id, "on_hand": 20, "reserved": 5 }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["available"], 15);

    // A second update for the same product replaces the row
    let response = app
        .post(
            "/api/inventory/update",
            Some(&token),
            json!({ "product_id": product_id, "on_hand": 40, "reserved": 10 }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get("/api/inventory", Some(&token)).await;
    let body = response_json(response).await;
    let rows = body["data"].as_array().expect("data should be an array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["available"], 30);
    assert_eq!(rows[0]["sku"], "BRG-1");
}

#[tokio::test]
async fn lead_time_survives_updates_that_omit_it() {
    let app = TestApp::spawn().await;
    let token = app.token_for(Role::Manager).await;
    let product_id = create_product(&app, &token, "WSH-1").await;

    let response = app
        .post(
            "/api/inventory/update",
            Some(&token),
            json!({ "product_id": product_id, "on_hand": 100, "reserved": 0, "lead_time_days": 12 }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Omitting lead_time_days updates the levels but keeps the stored value
    let response = app
        .post(
            "/api/inventory/update",
            Some(&token),
            json!({ "product_id": product_id, "on_hand": 80, "reserved": 20 }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get("/api/inventory", Some(&token)).await;
    let body = response_json(response).await;
    let rows = body["data"].as_array().expect("data should be an array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["available"], 60);
    assert_eq!(rows[0]["lead_time_days"], 12);
}

#[tokio::test]
async fn update_for_unknown_product_is_not_found() {
    let app = TestApp::spawn().await;
    let token = app.token_for(Role::Manager).await;

    let response = app
        .post(
            "/api/inventory/update",
            Some(&token),
            json!({ "product_id": 4242, "on_hand": 5, "reserved": 0 }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn negative_levels_are_rejected() {
    let app = TestApp::spawn().await;
    let token = app.token_for(Role::Manager).await;
    let product_id = create_product(&app, &token, "BLT-1").await;

    let response = app
        .post(
            "/api/inventory/update",
            Some(&token),
            json!({ "product_id": product_id, "on_hand": -3, "reserved": 0 }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listing_joins_product_identity() {
    let app = TestApp::spawn().await;
    let token = app.token_for(Role::Admin).await;
    let product_id = create_product(&app, &token, "SNS-K").await;

    app.post(
        "/api/inventory/update",
        Some(&token),
        json!({ "product_id": product_id, "on_hand": 90, "reserved": 10, "lead_time_days": 5 }),
    )
    .await;

    let response = app.get("/api/inventory", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    let row = &body["data"][0];
    assert_eq!(row["product_name"], "Product SNS-K");
    assert_eq!(row["reorder_level"], 100);
    assert_eq!(row["lead_time_days"], 5);
}
