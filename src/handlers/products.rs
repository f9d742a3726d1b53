use crate::{
    errors::ApiError,
    handlers::common::{
        created_response, no_content_response, success_response, validate_input, PaginationParams,
    },
    services::products::{CreateProductRequest, UpdateProductRequest},
    ApiResponse, AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

pub fn list_router() -> Router<AppState> {
    Router::new().route("/", get(list_products))
}

pub fn crud_router() -> Router<AppState> {
    Router::new()
        .route("/search", get(search_products))
        .route("/", axum::routing::post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct SearchQuery {
    pub q: String,
}

/// List products, newest first
#[utoipa::path(
    get,
    path = "/api/products",
    params(PaginationParams),
    responses(
        (status = 200, description = "Product list returned"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    pagination: Option<Query<PaginationParams>>,
) -> Result<Response, ApiError> {
    let Query(pagination) = pagination.unwrap_or_default();
    let products = state
        .services
        .products
        .list_products(pagination.per_page, pagination.offset())
        .await?;

    Ok(success_response(ApiResponse::success(products)))
}

/// Search products by sku, name or category
#[utoipa::path(
    get,
    path = "/api/products/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching products returned"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Response, ApiError> {
    let products = state.services.products.search_products(&query.q).await?;
    Ok(success_response(ApiResponse::success(products)))
}

/// Get a product by id
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product returned"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    let product = state
        .services
        .products
        .get_product(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product {} not found", id)))?;

    Ok(success_response(ApiResponse::success(product)))
}

/// Create a product
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;

    let product = state.services.products.create_product(payload).await?;
    Ok(created_response(ApiResponse::success(product)))
}

/// Replace a product's fields
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = i32, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;

    let product = state.services.products.update_product(id, payload).await?;
    Ok(success_response(ApiResponse::success(product)))
}

/// Delete a product. Rows referencing it make the delete fail with a
/// database error rather than silently succeeding.
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Delete blocked by referencing rows", body = crate::errors::ErrorResponse)
    ),
    tag = "products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    state.services.products.delete_product(id).await?;
    Ok(no_content_response())
}
