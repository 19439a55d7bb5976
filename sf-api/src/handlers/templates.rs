//! Discovery template settings handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::dto::{ListResponse, SaveTemplateRequest, TemplateDto};
use crate::error::{ApiError, ApiResult};
use crate::invalidation::{Collection, MutationKind};
use crate::state::AppState;

/// `GET /api/v1/settings/templates`
pub async fn list_templates(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<serde_json::Value>> {
    if let Some(cached) = state.cache.get(Collection::Templates, "").await {
        return Ok(Json(cached));
    }

    let templates = state.db.templates.list().await?;
    let dtos: Vec<TemplateDto> = templates.into_iter().map(TemplateDto::from).collect();
    let value = serde_json::to_value(ListResponse::new(dtos))
        .map_err(|e| ApiError::internal(e.to_string()))?;
    state.cache.put(Collection::Templates, "", value.clone()).await;
    Ok(Json(value))
}

/// `POST /api/v1/settings/templates`
pub async fn create_template(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SaveTemplateRequest>,
) -> ApiResult<(StatusCode, Json<TemplateDto>)> {
    let input = request.into_draft().validate().map_err(ApiError::validation)?;

    let template = state.templates.create(input).await?;
    state.invalidate(MutationKind::TemplateCreate).await;
    Ok((StatusCode::CREATED, Json(TemplateDto::from(template))))
}

/// `PUT /api/v1/settings/templates/:id`
pub async fn update_template(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<SaveTemplateRequest>,
) -> ApiResult<Json<TemplateDto>> {
    let input = request.into_draft().validate().map_err(ApiError::validation)?;

    let template = state.templates.update(&id, input).await?;
    state.invalidate(MutationKind::TemplateUpdate).await;
    Ok(Json(TemplateDto::from(template)))
}

/// `DELETE /api/v1/settings/templates/:id` - blocked while any session
/// references the template
pub async fn delete_template(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    state.templates.delete(&id).await?;
    state.invalidate(MutationKind::TemplateDelete).await;
    Ok(Json(serde_json::json!({ "status": "deleted" })))
}
