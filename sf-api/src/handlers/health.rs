//! Health and metrics endpoints

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::dto::HealthResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// `GET /health`
pub async fn health_check(State(state): State<Arc<AppState>>) -> ApiResult<Json<HealthResponse>> {
    let healthy = state.db.health_check().await.is_ok();
    Ok(Json(HealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
        version: state.config.version.clone(),
        uptime_secs: state.uptime_secs(),
    }))
}

/// `GET /metrics` - Prometheus exposition, when enabled
pub async fn render_metrics(State(state): State<Arc<AppState>>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
