use crate::{
    errors::ApiError,
    handlers::common::{
        created_response, no_content_response, success_response, validate_input,
    },
    services::plants::PlantRequest,
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
        .route("/", get(list_plants).post(create_plant))
        .route("/:id", axum::routing::put(update_plant).delete(delete_plant))
}

/// List plants by name
#[utoipa::path(
    get,
    path = "/api/plants",
    responses(
        (status = 200, description = "Plant list returned"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "plants"
)]
pub async fn list_plants(State(state): State<AppState>) -> Result<Response, ApiError> {
    let plants = state.services.plants.list_plants().await?;
    Ok(success_response(ApiResponse::success(plants)))
}

/// Create a plant
#[utoipa::path(
    post,
    path = "/api/plants",
    request_body = PlantRequest,
    responses(
        (status = 201, description = "Plant created"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "plants"
)]
pub async fn create_plant(
    State(state): State<AppState>,
    Json(payload): Json<PlantRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;

    let plant = state.services.plants.create_plant(payload).await?;
    Ok(created_response(ApiResponse::success(plant)))
}

/// Replace a plant's fields
#[utoipa::path(
    put,
    path = "/api/plants/{id}",
    params(("id" = i32, Path, description = "Plant ID")),
    request_body = PlantRequest,
    responses(
        (status = 200, description = "Plant updated"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "plants"
)]
pub async fn update_plant(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<PlantRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;

    let plant = state.services.plants.update_plant(id, payload).await?;
    Ok(success_response(ApiResponse::success(plant)))
}

/// Delete a plant
#[utoipa::path(
    delete,
    path = "/api/plants/{id}",
    params(("id" = i32, Path, description = "Plant ID")),
    responses(
        (status = 204, description = "Plant deleted"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "plants"
)]
pub async fn delete_plant(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    state.services.plants.delete_plant(id).await?;
    Ok(no_content_response())
}
