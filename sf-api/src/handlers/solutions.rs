//! Solution catalog handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use sf_db::entities::new_solution;

use crate::dto::{
    ListResponse, SaveSolutionRequest, SolutionDto, SolutionListQuery, SolutionStatusRequest,
};
use crate::error::{ApiError, ApiResult};
use crate::invalidation::{Collection, MutationKind};
use crate::state::AppState;

/// `GET /api/v1/solutions` - active by default, name-ordered
pub async fn list_solutions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SolutionListQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let params = format!(
        "q={}&include_archived={}",
        query.q.as_deref().unwrap_or(""),
        query.include_archived
    );
    if let Some(cached) = state.cache.get(Collection::Solutions, &params).await {
        return Ok(Json(cached));
    }

    let solutions = state
        .db
        .solutions
        .list(query.include_archived, query.q.as_deref())
        .await?;
    let dtos: Vec<SolutionDto> = solutions.into_iter().map(SolutionDto::from).collect();
    let value = serde_json::to_value(ListResponse::new(dtos))
        .map_err(|e| ApiError::internal(e.to_string()))?;
    state.cache.put(Collection::Solutions, &params, value.clone()).await;
    Ok(Json(value))
}

/// `POST /api/v1/solutions`
pub async fn create_solution(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SaveSolutionRequest>,
) -> ApiResult<(StatusCode, Json<SolutionDto>)> {
    let input = request.into_draft().validate().map_err(ApiError::validation)?;

    let solution = new_solution(input);
    state.db.solutions.insert(&solution).await?;
    state.invalidate(MutationKind::SolutionCreate).await;
    Ok((StatusCode::CREATED, Json(SolutionDto::from(solution))))
}

/// `GET /api/v1/solutions/:id`
pub async fn get_solution(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<SolutionDto>> {
    let solution = state
        .db
        .solutions
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("solution", &id))?;
    Ok(Json(SolutionDto::from(solution)))
}

/// `PUT /api/v1/solutions/:id`
pub async fn update_solution(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<SaveSolutionRequest>,
) -> ApiResult<Json<SolutionDto>> {
    let input = request.into_draft().validate().map_err(ApiError::validation)?;

    let solution = state.db.solutions.update(&id, &input).await?;
    state.invalidate(MutationKind::SolutionUpdate).await;
    Ok(Json(SolutionDto::from(solution)))
}

/// `PUT /api/v1/solutions/:id/status` - archive or activate
pub async fn set_solution_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<SolutionStatusRequest>,
) -> ApiResult<Json<SolutionDto>> {
    let solution = state.db.solutions.set_active(&id, request.is_active).await?;
    state.invalidate(MutationKind::SolutionStatusChange).await;
    tracing::info!(
        solution_id = %id,
        is_active = request.is_active,
        "solution status changed"
    );
    Ok(Json(SolutionDto::from(solution)))
}

/// `DELETE /api/v1/solutions/:id`
pub async fn delete_solution(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    if !state.db.solutions.delete(&id).await? {
        return Err(ApiError::not_found("solution", &id));
    }
    state.invalidate(MutationKind::SolutionDelete).await;
    Ok(Json(serde_json::json!({ "status": "deleted" })))
}
