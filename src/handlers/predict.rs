use crate::{errors::ApiError, AppState};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tracing::warn;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(predict_health))
}

/// Proxy the prediction service's health probe.
///
/// An unreachable or failing upstream maps to 503, not the generic
/// bad-gateway used for completion providers.
#[utoipa::path(
    get,
    path = "/api/predict/health",
    responses(
        (status = 200, description = "Prediction service healthy"),
        (status = 503, description = "Prediction service unreachable")
    ),
    tag = "predict"
)]
pub async fn predict_health(State(state): State<AppState>) -> Result<Response, ApiError> {
    match state.services.predict.health().await {
        Ok(body) => Ok(Json(json!({
            "success": true,
            "python_api": body,
        }))
        .into_response()),
        Err(e) => {
            warn!(error = %e, "prediction service health probe failed");
            Ok((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "Prediction service unavailable",
                })),
            )
                .into_response())
        }
    }
}
