use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

/// Health check endpoint for liveness probes.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "study-service",
            "provider": state.study.provider().name(),
            "model": state.config.models.text_model,
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// Readiness check: the provider must be configured.
pub async fn readiness_check(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state
        .study
        .provider()
        .health_check()
        .await
        .map_err(|e| AppError::ServiceUnavailable(e.to_string()))?;

    Ok(StatusCode::OK)
}
