//! Discovery session handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use sf_core::views::contains_ci;

use crate::dto::{
    AttachTemplateRequest, LinkResultDto, LinkSolutionRequest, ListResponse, NotesRequest,
    SaveSessionRequest, SectionContentDto, SectionNotesRequest, SectionNotesResponse,
    SessionDto, SessionListQuery, SolutionDto,
};
use crate::error::{ApiError, ApiResult};
use crate::invalidation::{Collection, MutationKind};
use crate::state::AppState;

/// `GET /api/v1/discovery` - sessions, most recent first; `q` searches
/// client and opportunity names
pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SessionListQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let params = format!("q={}", query.q.as_deref().unwrap_or(""));
    if let Some(cached) = state.cache.get(Collection::Sessions, &params).await {
        return Ok(Json(cached));
    }

    let mut sessions = state.db.sessions.list().await?;
    if let Some(term) = query.q.as_deref() {
        sessions.retain(|session| {
            contains_ci(&session.client_name, term)
                || session
                    .opportunity_name
                    .as_deref()
                    .is_some_and(|name| contains_ci(name, term))
        });
    }
    let dtos: Vec<SessionDto> = sessions.into_iter().map(SessionDto::from).collect();
    let value = serde_json::to_value(ListResponse::new(dtos))
        .map_err(|e| ApiError::internal(e.to_string()))?;
    state.cache.put(Collection::Sessions, &params, value.clone()).await;
    Ok(Json(value))
}

/// `POST /api/v1/discovery`
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SaveSessionRequest>,
) -> ApiResult<(StatusCode, Json<SessionDto>)> {
    let input = request.into_draft().validate().map_err(ApiError::validation)?;

    let session = state.discovery.create_session(input).await?;
    state.invalidate(MutationKind::SessionCreate).await;
    Ok((StatusCode::CREATED, Json(SessionDto::from(session))))
}

/// `GET /api/v1/discovery/:id`
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<SessionDto>> {
    let session = state
        .db
        .sessions
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("discovery session", &id))?;
    Ok(Json(SessionDto::from(session)))
}

/// `PUT /api/v1/discovery/:id` - headline fields
pub async fn update_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<SaveSessionRequest>,
) -> ApiResult<Json<SessionDto>> {
    let input = request.into_draft().validate().map_err(ApiError::validation)?;

    let session = state.db.sessions.update(&id, &input).await?;
    state.invalidate(MutationKind::SessionUpdate).await;
    Ok(Json(SessionDto::from(session)))
}

/// `DELETE /api/v1/discovery/:id`
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    if !state.db.sessions.delete(&id).await? {
        return Err(ApiError::not_found("discovery session", &id));
    }
    state.invalidate(MutationKind::SessionDelete).await;
    Ok(Json(serde_json::json!({ "status": "deleted" })))
}

/// `PUT /api/v1/discovery/:id/notes` - save the whole notes blob
pub async fn save_notes(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<NotesRequest>,
) -> ApiResult<Json<SessionDto>> {
    let session = state.discovery.save_notes(&id, &request.notes).await?;
    state.invalidate(MutationKind::SessionNotesSave).await;
    Ok(Json(SessionDto::from(session)))
}

/// `PUT /api/v1/discovery/:id/template` - attach or detach a template
pub async fn attach_template(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<AttachTemplateRequest>,
) -> ApiResult<Json<SessionDto>> {
    let session = state
        .discovery
        .attach_template(&id, request.template_id.as_deref())
        .await?;
    state.invalidate(MutationKind::SessionTemplateChange).await;
    Ok(Json(SessionDto::from(session)))
}

/// `GET /api/v1/discovery/:id/sections` - notes decoded against the
/// attached template, in template order
pub async fn get_section_notes(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<SectionNotesResponse>> {
    let sections = state
        .discovery
        .section_notes(&id)
        .await?
        .into_iter()
        .map(|(name, content)| SectionContentDto { name, content })
        .collect();
    Ok(Json(SectionNotesResponse { sections }))
}

/// `PUT /api/v1/discovery/:id/sections` - encode per-section content
/// through the template and store it
pub async fn save_section_notes(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<SectionNotesRequest>,
) -> ApiResult<Json<SessionDto>> {
    let session = state
        .discovery
        .save_section_notes(&id, &request.sections)
        .await?;
    state.invalidate(MutationKind::SessionNotesSave).await;
    Ok(Json(SessionDto::from(session)))
}

/// `GET /api/v1/discovery/:id/solutions` - linked solutions
pub async fn list_linked_solutions(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    if let Some(cached) = state.cache.get(Collection::SessionSolutions, &id).await {
        return Ok(Json(cached));
    }

    let solutions = state.discovery.linked_solutions(&id).await?;
    let dtos: Vec<SolutionDto> = solutions.into_iter().map(SolutionDto::from).collect();
    let value = serde_json::to_value(ListResponse::new(dtos))
        .map_err(|e| ApiError::internal(e.to_string()))?;
    state
        .cache
        .put(Collection::SessionSolutions, &id, value.clone())
        .await;
    Ok(Json(value))
}

/// `POST /api/v1/discovery/:id/solutions` - link a solution.
///
/// Linking an already-linked solution succeeds with an informational
/// `already_linked` status, not an error.
pub async fn link_solution(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<LinkSolutionRequest>,
) -> ApiResult<Json<LinkResultDto>> {
    let outcome = state
        .discovery
        .link_solution(&id, &request.solution_id)
        .await?;
    state.invalidate(MutationKind::SolutionLink).await;
    Ok(Json(LinkResultDto::from(outcome)))
}

/// `DELETE /api/v1/discovery/:id/solutions/:solution_id` - unlink;
/// absent pairs are a silent no-op
pub async fn unlink_solution(
    State(state): State<Arc<AppState>>,
    Path((id, solution_id)): Path<(String, String)>,
) -> ApiResult<Json<LinkResultDto>> {
    let outcome = state.discovery.unlink_solution(&id, &solution_id).await?;
    state.invalidate(MutationKind::SolutionUnlink).await;
    Ok(Json(LinkResultDto::from(outcome)))
}
