pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod request_id;
pub mod services;

use auth::{AuthRouterExt, Role};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use handlers::AppServices;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: AppServices,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let services = AppServices::new(db.clone(), &config);
        Self {
            db,
            config,
            services,
        }
    }
}

/// Per-response metadata attached to the standard envelope
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ResponseMeta {
    /// Captures the request id from the current task scope, when present
    pub fn capture() -> Self {
        Self {
            request_id: request_id::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now(),
        }
    }
}

/// Standard API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }
}

const MANAGER_ADMIN: &[Role] = &[Role::Manager, Role::Admin];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// All routes under `/api`.
///
/// The product list is readable by managers and admins only, while the rest
/// of the product surface needs any authenticated user; the two routers merge
/// so the method routers at `/products` carry different guards.
pub fn api_routes(services: &AppServices) -> Router<AppState> {
    let auth = services.auth.clone();

    Router::new()
        .nest("/auth", handlers::auth::router())
        .nest(
            "/products",
            handlers::products::list_router()
                .with_roles(auth.clone(), MANAGER_ADMIN)
                .merge(handlers::products::crud_router().with_auth(auth.clone())),
        )
        .nest(
            "/inventory",
            handlers::inventory::router().with_auth(auth.clone()),
        )
        .nest(
            "/suppliers",
            handlers::suppliers::router().with_auth(auth.clone()),
        )
        .nest(
            "/purchase-orders",
            handlers::purchase_orders::router().with_auth(auth.clone()),
        )
        .nest(
            "/users",
            handlers::users::router().with_roles(auth.clone(), ADMIN_ONLY),
        )
        .nest("/plants", handlers::plants::router().with_auth(auth.clone()))
        .nest(
            "/ai-models",
            handlers::ai_models::router().with_auth(auth.clone()),
        )
        .nest("/sales", handlers::sales::router().with_auth(auth.clone()))
        .nest(
            "/chat",
            handlers::insights::chat_router().with_roles(auth.clone(), MANAGER_ADMIN),
        )
        .nest("/chat/public", handlers::insights::public_chat_router())
        .nest(
            "/insights",
            handlers::insights::insights_router().with_auth(auth.clone()),
        )
        .nest(
            "/analysis",
            handlers::insights::analysis_router().with_auth(auth),
        )
        .nest("/predict", handlers::predict::router())
        .route("/ping", get(ping))
        .route("/status", get(api_status))
        .route("/health", get(health_check))
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/api/ping",
    responses((status = 200, description = "Service is running")),
    tag = "ops"
)]
pub async fn ping() -> impl IntoResponse {
    Json(json!({
        "message": "Manufacturing API is running",
        "status": "ok",
    }))
}

/// Build and version information
#[utoipa::path(
    get,
    path = "/api/status",
    responses((status = 200, description = "Version and environment info")),
    tag = "ops"
)]
pub async fn api_status(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment,
        "timestamp": Utc::now(),
    }))
}

/// Readiness probe that verifies database connectivity
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Database reachable"),
        (status = 503, description = "Database unreachable")
    ),
    tag = "ops"
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "healthy", "database": "connected" })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unhealthy", "database": "unreachable" })),
            )
        }
    }
}

#[cfg(test)]
mod response_tests {
    use super::*;
    use crate::request_id::{scope_request_id, RequestId};

    #[test]
    fn success_envelope_carries_data_and_meta() {
        let response = ApiResponse::success(vec![1, 2, 3]);
        assert!(response.success);
        assert_eq!(response.data, Some(vec![1, 2, 3]));
        assert!(response.meta.is_some());
    }

    #[tokio::test]
    async fn meta_picks_up_the_scoped_request_id() {
        let id = RequestId::new("req-123");
        let response = scope_request_id(id, async { ApiResponse::success(()) }).await;
        let meta = response.meta.unwrap();
        assert_eq!(meta.request_id.as_deref(), Some("req-123"));
    }

    #[test]
    fn error_envelope_skips_empty_fields() {
        let response: ApiResponse<()> = ApiResponse::error("boom");
        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "boom");
        assert!(body.get("data").is_none());
        assert!(body.get("errors").is_none());
    }
}
