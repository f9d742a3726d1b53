use crate::{
    errors::ApiError,
    handlers::common::{
        created_response, no_content_response, success_response, validate_input,
    },
    services::suppliers::SupplierRequest,
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
        .route("/", get(list_suppliers).post(create_supplier))
        .route("/:id", axum::routing::put(update_supplier).delete(delete_supplier))
}

/// List suppliers by name
#[utoipa::path(
    get,
    path = "/api/suppliers",
    responses(
        (status = 200, description = "Supplier list returned"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "suppliers"
)]
pub async fn list_suppliers(State(state): State<AppState>) -> Result<Response, ApiError> {
    let suppliers = state.services.suppliers.list_suppliers().await?;
    Ok(success_response(ApiResponse::success(suppliers)))
}

/// Create a supplier
#[utoipa::path(
    post,
    path = "/api/suppliers",
    request_body = SupplierRequest,
    responses(
        (status = 201, description = "Supplier created"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "suppliers"
)]
pub async fn create_supplier(
    State(state): State<AppState>,
    Json(payload): Json<SupplierRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;

    let supplier = state.services.suppliers.create_supplier(payload).await?;
    Ok(created_response(ApiResponse::success(supplier)))
}

/// Replace a supplier's fields
#[utoipa::path(
    put,
    path = "/api/suppliers/{id}",
    params(("id" = i32, Path, description = "Supplier ID")),
    request_body = SupplierRequest,
    responses(
        (status = 200, description = "Supplier updated"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "suppliers"
)]
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<SupplierRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;

    let supplier = state
        .services
        .suppliers
        .update_supplier(id, payload)
        .await?;
    Ok(success_response(ApiResponse::success(supplier)))
}

/// Delete a supplier
#[utoipa::path(
    delete,
    path = "/api/suppliers/{id}",
    params(("id" = i32, Path, description = "Supplier ID")),
    responses(
        (status = 204, description = "Supplier deleted"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "suppliers"
)]
pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    state.services.suppliers.delete_supplier(id).await?;
    Ok(no_content_response())
}
