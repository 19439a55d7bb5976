//! Dashboard endpoint

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::dto::DashboardResponse;
use crate::error::{ApiError, ApiResult};
use crate::invalidation::Collection;
use crate::state::AppState;

/// `GET /api/v1/dashboard` - headline tallies
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<serde_json::Value>> {
    if let Some(cached) = state.cache.get(Collection::Dashboard, "").await {
        return Ok(Json(cached));
    }

    let response = DashboardResponse {
        active_solutions: state.db.solutions.count_active().await?,
        open_opportunities: state.db.opportunities.count_open().await?,
        discovery_sessions: state.db.sessions.count().await?,
    };
    let value = serde_json::to_value(&response).map_err(|e| ApiError::internal(e.to_string()))?;
    state.cache.put(Collection::Dashboard, "", value.clone()).await;
    Ok(Json(value))
}
