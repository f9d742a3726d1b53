use crate::{
    errors::ApiError,
    handlers::common::{
        created_response, no_content_response, success_response, validate_input,
    },
    services::ai_models::AiModelRequest,
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
        .route("/", get(list_models).post(create_model))
        .route(
            "/:id",
            get(get_model).put(update_model).delete(delete_model),
        )
}

/// List registered models by name
#[utoipa::path(
    get,
    path = "/api/ai-models",
    responses(
        (status = 200, description = "Model list returned"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse)
    ),
    tag = "ai-models"
)]
pub async fn list_models(State(state): State<AppState>) -> Result<Response, ApiError> {
    let models = state.services.ai_models.list_models().await?;
    Ok(success_response(ApiResponse::success(models)))
}

/// Get a model by id
#[utoipa::path(
    get,
    path = "/api/ai-models/{id}",
    params(("id" = i32, Path, description = "Model ID")),
    responses(
        (status = 200, description = "Model returned"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "ai-models"
)]
pub async fn get_model(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    let model = state
        .services
        .ai_models
        .get_model(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("AI model {} not found", id)))?;

    Ok(success_response(ApiResponse::success(model)))
}

/// Register a model
#[utoipa::path(
    post,
    path = "/api/ai-models",
    request_body = AiModelRequest,
    responses(
        (status = 201, description = "Model created"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "ai-models"
)]
pub async fn create_model(
    State(state): State<AppState>,
    Json(payload): Json<AiModelRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;

    let model = state.services.ai_models.create_model(payload).await?;
    Ok(created_response(ApiResponse::success(model)))
}

/// Replace a model's fields
#[utoipa::path(
    put,
    path = "/api/ai-models/{id}",
    params(("id" = i32, Path, description = "Model ID")),
    request_body = AiModelRequest,
    responses(
        (status = 200, description = "Model updated"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "ai-models"
)]
pub async fn update_model(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<AiModelRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;

    let model = state.services.ai_models.update_model(id, payload).await?;
    Ok(success_response(ApiResponse::success(model)))
}

/// Delete a model
#[utoipa::path(
    delete,
    path = "/api/ai-models/{id}",
    params(("id" = i32, Path, description = "Model ID")),
    responses(
        (status = 204, description = "Model deleted"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "ai-models"
)]
pub async fn delete_model(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    state.services.ai_models.delete_model(id).await?;
    Ok(no_content_response())
}
