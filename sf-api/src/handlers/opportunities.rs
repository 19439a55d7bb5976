//! Opportunity pipeline handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use sf_core::forms::FieldError;
use sf_core::views::{OpportunityFilter, SortDir, SortField, SortSpec};

use crate::dto::{
    CreateOpportunityRequest, LinkSessionRequest, ListResponse, OpportunityDto,
    OpportunityListQuery, StageCountDto, SummaryResponse, TypeCountDto, UpdateOpportunityRequest,
    draft_from_opportunity,
};
use crate::error::{ApiError, ApiResult};
use crate::invalidation::{Collection, MutationKind};
use crate::state::AppState;

fn parse_selectors(query: &OpportunityListQuery) -> ApiResult<(OpportunityFilter, SortSpec)> {
    let filter = OpportunityFilter::parse(
        query.stage.as_deref(),
        query.opportunity_type.as_deref(),
    )
    .map_err(|e| ApiError::validation(vec![FieldError::new("filter", e.to_string())]))?;

    let sort = match (query.sort.as_deref(), query.dir.as_deref()) {
        (None, None) => SortSpec::default(),
        (field, dir) => SortSpec {
            field: field
                .map(SortField::parse)
                .transpose()
                .map_err(|e| ApiError::validation(vec![FieldError::new("sort", e.to_string())]))?
                .unwrap_or(SortField::CreatedAt),
            dir: dir.map(SortDir::parse).unwrap_or(SortDir::Asc),
        },
    };
    Ok((filter, sort))
}

fn cache_params(filter: &OpportunityFilter, sort: SortSpec) -> String {
    format!(
        "stage={}&type={}&sort={}",
        filter.stage.map(|s| s.as_str()).unwrap_or("all"),
        filter.opportunity_type.map(|t| t.as_str()).unwrap_or("all"),
        sort.canonical()
    )
}

/// `GET /api/v1/opportunities` - filtered, sorted list
pub async fn list_opportunities(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OpportunityListQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let (filter, sort) = parse_selectors(&query)?;
    let params = cache_params(&filter, sort);
    if let Some(cached) = state.cache.get(Collection::Opportunities, &params).await {
        return Ok(Json(cached));
    }

    let opportunities = state.db.opportunities.list(&filter, sort).await?;
    let dtos: Vec<OpportunityDto> = opportunities.into_iter().map(OpportunityDto::from).collect();
    let value = serde_json::to_value(ListResponse::new(dtos))
        .map_err(|e| ApiError::internal(e.to_string()))?;
    state
        .cache
        .put(Collection::Opportunities, &params, value.clone())
        .await;
    Ok(Json(value))
}

/// `GET /api/v1/opportunities/summary` - per-stage and per-type tallies
/// over the whole collection, independent of any list filter
pub async fn opportunity_summary(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<serde_json::Value>> {
    if let Some(cached) = state.cache.get(Collection::OpportunitySummary, "").await {
        return Ok(Json(cached));
    }

    let response = SummaryResponse {
        stages: state
            .db
            .opportunities
            .stage_summary()
            .await?
            .into_iter()
            .map(StageCountDto::from)
            .collect(),
        types: state
            .db
            .opportunities
            .type_summary()
            .await?
            .into_iter()
            .map(TypeCountDto::from)
            .collect(),
    };
    let value = serde_json::to_value(&response).map_err(|e| ApiError::internal(e.to_string()))?;
    state
        .cache
        .put(Collection::OpportunitySummary, "", value.clone())
        .await;
    Ok(Json(value))
}

/// `POST /api/v1/opportunities`
pub async fn create_opportunity(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateOpportunityRequest>,
) -> ApiResult<(StatusCode, Json<OpportunityDto>)> {
    let input = request.into_draft().validate().map_err(ApiError::validation)?;

    let opportunity = state.opportunities.create(input).await?;
    state.invalidate(MutationKind::OpportunityCreate).await;
    Ok((StatusCode::CREATED, Json(OpportunityDto::from(opportunity))))
}

/// `GET /api/v1/opportunities/:id`
pub async fn get_opportunity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<OpportunityDto>> {
    let opportunity = state
        .db
        .opportunities
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("opportunity", &id))?;
    Ok(Json(OpportunityDto::from(opportunity)))
}

/// `PUT /api/v1/opportunities/:id` - partial update.
///
/// Provided fields are replayed onto a draft of the stored record, so
/// a type change without an explicit stage resets the stage to the new
/// type's first rung.
pub async fn update_opportunity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<UpdateOpportunityRequest>,
) -> ApiResult<Json<OpportunityDto>> {
    let current = state
        .db
        .opportunities
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("opportunity", &id))?;

    let draft = request.apply_to(draft_from_opportunity(&current));
    let input = draft.validate().map_err(ApiError::validation)?;

    let opportunity = state.opportunities.update(&id, input).await?;
    state.invalidate(MutationKind::OpportunityUpdate).await;
    Ok(Json(OpportunityDto::from(opportunity)))
}

/// `PUT /api/v1/opportunities/:id/session` - link or detach the
/// discovery session (at most one)
pub async fn link_discovery_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<LinkSessionRequest>,
) -> ApiResult<Json<OpportunityDto>> {
    let opportunity = state
        .opportunities
        .set_discovery_session(&id, request.discovery_session_id.as_deref())
        .await?;
    state.invalidate(MutationKind::OpportunitySessionLink).await;
    Ok(Json(OpportunityDto::from(opportunity)))
}

/// `DELETE /api/v1/opportunities/:id`
pub async fn delete_opportunity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    if !state.db.opportunities.delete(&id).await? {
        return Err(ApiError::not_found("opportunity", &id));
    }
    state.invalidate(MutationKind::OpportunityDelete).await;
    Ok(Json(serde_json::json!({ "status": "deleted" })))
}
