use crate::{
    errors::ApiError,
    handlers::common::{created_response, success_response, validate_input},
    services::sales::CreateSaleRequest,
    ApiResponse, AppState,
};
use axum::{
    extract::{Query, State},
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

const DEFAULT_WINDOW_DAYS: i64 = 30;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(recent_sales).post(create_sale))
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct SalesWindow {
    /// Trailing window in days, defaults to 30
    pub days: Option<i64>,
}

/// List sales from the trailing window, joined with product identity
#[utoipa::path(
    get,
    path = "/api/sales",
    params(SalesWindow),
    responses(
        (status = 200, description = "Recent sales returned"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "sales"
)]
pub async fn recent_sales(
    State(state): State<AppState>,
    window: Option<Query<SalesWindow>>,
) -> Result<Response, ApiError> {
    let Query(window) = window.unwrap_or_default();
    let days = window.days.unwrap_or(DEFAULT_WINDOW_DAYS).max(1);

    let sales = state.services.sales.recent_sales(days).await?;
    Ok(success_response(ApiResponse::success(sales)))
}

/// Record a sale; profit and margin are derived server-side
#[utoipa::path(
    post,
    path = "/api/sales",
    request_body = CreateSaleRequest,
    responses(
        (status = 201, description = "Sale recorded"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "sales"
)]
pub async fn create_sale(
    State(state): State<AppState>,
    Json(payload): Json<CreateSaleRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;

    let sale = state.services.sales.create_sale(payload).await?;
    Ok(created_response(ApiResponse::success(sale)))
}
