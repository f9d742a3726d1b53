use crate::{
    auth::Role,
    errors::ApiError,
    handlers::common::{
        created_response, no_content_response, success_response, validate_input,
    },
    services::users::{CreateUserRequest, UpdateUserRequest},
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
        .route("/", get(list_users).post(create_user))
        .route(
            "/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

/// List users, newest first
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "User list returned"),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    tag = "users"
)]
pub async fn list_users(State(state): State<AppState>) -> Result<Response, ApiError> {
    let users = state.services.users.list_users().await?;
    Ok(success_response(ApiResponse::success(users)))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User returned"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    let user = state
        .services
        .users
        .get_user(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {} not found", id)))?;

    Ok(success_response(ApiResponse::success(user)))
}

/// Create a user with a server-side password hash
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::errors::ErrorResponse)
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;

    let password_hash = state.services.auth.hash_password(&payload.password)?;
    let user = state
        .services
        .users
        .create_user(
            payload.email,
            password_hash,
            payload.name,
            payload.role.unwrap_or(Role::Manager),
        )
        .await?;

    Ok(created_response(ApiResponse::success(user)))
}

/// Replace a user's email, name and role
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Response, ApiError> {
    validate_input(&payload)?;

    let user = state.services.users.update_user(id, payload).await?;
    Ok(success_response(ApiResponse::success(user)))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    state.services.users.delete_user(id).await?;
    Ok(no_content_response())
}
