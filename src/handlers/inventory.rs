use crate::{
    errors::ApiError,
    handlers::common::{success_response, validate_input},
    services::inventory::UpdateInventoryRequest,
    ApiResponse, AppState,
};
use axum::{
    extract::State,
    response::Response,
    routing::{get, post},
    Json, Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_inventory))
        .route("/update", post(update_inventory))
}

/// List inventory joined with product identity and reorder data
#[utoipa::path(
    get,
    path = "/api/inventory",
    responses(
        (status = 200, description = "Inventory list returned"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn list_inventory(State(state): State<AppState>) -> Result<Response, ApiError> {
    let rows = state.services.inventory.list_inventory().await?;
    Ok(success_response(ApiResponse::success(rows)))
}

/// Upsert the stock levels for a product.
///
/// `available` is recomputed server-side from `on_hand - reserved`.
#[utoipa::path(
    post,
    path = "/api/inventory/update",
    request_body = UpdateInventoryRequest,
    responses(
        (status = 200, description = "Inventory row upserted"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown product", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn update_inventory(
    State(state): State<AppState>,
    Json(payload): Json<UpdateInventoryRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;

    let row = state.services.inventory.update_inventory(payload).await?;
    Ok(success_response(ApiResponse::success(row)))
}
