use crate::{
    errors::ApiError,
    handlers::common::{
        created_response, no_content_response, success_response, validate_input,
    },
    services::purchase_orders::{CreatePurchaseOrderRequest, UpdatePurchaseOrderRequest},
    ApiResponse, AppState,
};
use axum::{
    extract::{Path, State},
    response::Response,
    routing::get,
    Json, Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_purchase_orders).post(create_purchase_order))
        .route(
            "/:id",
            axum::routing::put(update_purchase_order).delete(delete_purchase_order),
        )
}

/// List purchase orders joined with product and supplier identity, newest first
#[utoipa::path(
    get,
    path = "/api/purchase-orders",
    responses(
        (status = 200, description = "Purchase order list returned"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn list_purchase_orders(State(state): State<AppState>) -> Result<Response, ApiError> {
    let orders = state
        .services
        .purchase_orders
        .list_purchase_orders()
        .await?;
    Ok(success_response(ApiResponse::success(orders)))
}

/// Create a purchase order; total amount is computed server-side
#[utoipa::path(
    post,
    path = "/api/purchase-orders",
    request_body = CreatePurchaseOrderRequest,
    responses(
        (status = 201, description = "Purchase order created"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn create_purchase_order(
    State(state): State<AppState>,
    Json(payload): Json<CreatePurchaseOrderRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;

    let order = state
        .services
        .purchase_orders
        .create_purchase_order(payload)
        .await?;
    Ok(created_response(ApiResponse::success(order)))
}

/// Update a purchase order's status
#[utoipa::path(
    put,
    path = "/api/purchase-orders/{id}",
    params(("id" = i32, Path, description = "Purchase order ID")),
    request_body = UpdatePurchaseOrderRequest,
    responses(
        (status = 200, description = "Status updated"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn update_purchase_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdatePurchaseOrderRequest>,
) -> Result<Response, ApiError> {
    let order = state
        .services
        .purchase_orders
        .update_status(id, payload)
        .await?;
    Ok(success_response(ApiResponse::success(order)))
}

/// Delete a purchase order
#[utoipa::path(
    delete,
    path = "/api/purchase-orders/{id}",
    params(("id" = i32, Path, description = "Purchase order ID")),
    responses(
        (status = 204, description = "Purchase order deleted"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn delete_purchase_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    state
        .services
        .purchase_orders
        .delete_purchase_order(id)
        .await?;
    Ok(no_content_response())
}
