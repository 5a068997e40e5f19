use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

pub const HOME_STATUS: &str = "App is running! Integrate with Zapier via /run_cycle POST.";

/// Fixed status payload at `/`.
pub async fn home() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": HOME_STATUS })))
}

/// Health check endpoint for Docker/K8s liveness probes.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "relay-service",
            "version": env!("CARGO_PKG_VERSION"),
            "model": state.config.grok.model,
            "generation_configured": state.text_provider.health_check().await.is_ok(),
            "webhook_configured": state.webhook.is_configured()
        })),
    )
}

/// Readiness check endpoint for K8s readiness probes.
pub async fn readiness_check(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.text_provider.health_check().await.map_err(|e| {
        tracing::warn!(error = %e, "Not ready");
        AppError::ServiceUnavailable
    })?;
    Ok(StatusCode::OK)
}
