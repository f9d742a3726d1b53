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
                "unit_price": "25.00",
                "cost_price": "15.00",
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    body["data"]["id"].as_i64().expect("id should be set")
}

#[tokio::test]
async fn recording_a_sale_derives_profit_and_margin() {
    let app = TestApp::spawn().await;
    let token = app.token_for(Role::Manager).await;
    let product_id = create_product(&app, &token, "BRG-1").await;

    let response = app
        .post(
            "/api/sales",
            Some(&token),
            json!({
                "product_id": product_id,
                "quantity": 10,
                "sale_price": "25.00",
                "cost_price": "15.00",
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["data"]["profit"], "100.00");
    assert_eq!(body["data"]["profit_margin"], "40.00");
}

#[tokio::test]
async fn recent_sales_are_joined_with_the_product() {
    let app = TestApp::spawn().await;
    let token = app.token_for(Role::Manager).await;
    let product_id = create_product(&app, &token, "MTR-1").await;

    app.post(
        "/api/sales",
        Some(&token),
        json!({
            "product_id": product_id,
            "quantity": 2,
            "sale_price": "189.00",
            "cost_price": "122.00",
        }),
    )
    .await;

    let response = app.get("/api/sales?days=7", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    let rows = body["data"].as_array().expect("data should be an array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["sku"], "MTR-1");
    assert_eq!(rows[0]["product_name"], "Product MTR-1");
    assert_eq!(rows[0]["quantity"], 2);
}

#[tokio::test]
async fn zero_quantity_sale_is_rejected() {
    let app = TestApp::spawn().await;
    let token = app.token_for(Role::Manager).await;
    let product_id = create_product(&app, &token, "PLT-1").await;

    let response = app
        .post(
            "/api/sales",
            Some(&token),
            json!({
                "product_id": product_id,
                "quantity": 0,
                "sale_price": "5.00",
                "cost_price": "1.00",
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn purchase_order_list_joins_product_and_supplier() {
    let app = TestApp::spawn().await;
    let token = app.token_for(Role::Manager).await;
    let product_id = create_product(&app, &token, "BRG-2").await;

    let response = app
        .post(
            "/api/suppliers",
            Some(&token),
            json!({ "name": "Precision Bearings Co" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let supplier = response_json(response).await;
    let supplier_id = supplier["data"]["id"].as_i64().unwrap();

    // One order with a supplier, one without
    let response = app
        .post(
            "/api/purchase-orders",
            Some(&token),
            json!({
                "product_id": product_id,
                "supplier_id": supplier_id,
                "quantity": 10,
                "unit_price": "4.80",
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .post(
            "/api/purchase-orders",
            Some(&token),
            json!({
                "product_id": product_id,
                "quantity": 5,
                "unit_price": "4.80",
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.get("/api/purchase-orders", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    let rows = body["data"].as_array().expect("data should be an array");
    assert_eq!(rows.len(), 2);
    for row in rows {
        assert_eq!(row["sku"], "BRG-2");
        assert_eq!(row["product_name"], "Product BRG-2");
    }
    let with_supplier: Vec<_> = rows
        .iter()
        .filter(|row| row["supplier_name"] == "Precision Bearings Co")
        .collect();
    assert_eq!(with_supplier.len(), 1);
    let without_supplier: Vec<_> = rows
        .iter()
        .filter(|row| row["supplier_name"].is_null())
        .collect();
    assert_eq!(without_supplier.len(), 1);
}

#[tokio::test]
async fn purchase_order_total_is_computed_on_insert() {
    let app = TestApp::spawn().await;
    let token = app.token_for(Role::Manager).await;
    let product_id = create_product(&app, &token, "BLT-1").await;

    let response = app
        .post(
            "/api/purchase-orders",
            Some(&token),
            json!({
                "product_id": product_id,
                "quantity": 40,
                "unit_price": "12.50",
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["data"]["total_amount"], "500.00");
    assert_eq!(body["data"]["status"], "pending");
    let order_id = body["data"]["id"].as_i64().unwrap();

    let response = app
        .put(
            &format!("/api/purchase-orders/{}", order_id),
            Some(&token),
            json!({ "status": "received" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "received");
    // Status updates leave the computed total alone
    assert_eq!(body["data"]["total_amount"], "500.00");
}
