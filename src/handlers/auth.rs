use crate::{
    auth::{LoginRequest, RegisterRequest},
    errors::ApiError,
    handlers::common::{created_response, validate_input},
    ApiResponse, AppState,
};
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;

    let user = state.services.auth.register(payload).await?;
    Ok(created_response(ApiResponse::success(user)))
}

/// Log in with email, password and the selected role
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated; returns user and token"),
        (status = 401, description = "Invalid credentials or role mismatch", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let (user, token) = state.services.auth.login(payload).await?;

    Ok(Json(ApiResponse::success(json!({
        "user": user,
        "token": token,
    })))
    .into_response())
}
