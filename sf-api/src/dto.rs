//! Request and response DTOs
//!
//! Request bodies carry form-shaped text (amounts and dates as typed by
//! the user); conversion into typed input goes through the drafts in
//! `sf_core::forms`, so the API boundary applies exactly the rules the
//! forms do - including the stage reset on type change.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use sf_core::forms::{
    OpportunityDraft, OpportunityField, SessionDraft, SessionField, SolutionDraft, SolutionField,
    TemplateDraft,
};
use sf_core::types::{
    DiscoverySession, DiscoveryTemplate, Opportunity, Solution, StageCategory,
};
use sf_db::{LinkOutcome, StageCount, TypeCount, UnlinkOutcome, UserRecord};

// ============================================
// Generic wrappers
// ============================================

/// List response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> ListResponse<T> {
    pub fn new(items: Vec<T>) -> Self {
        let total = items.len();
        Self { items, total }
    }
}

// ============================================
// Auth
// ============================================

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserDto {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<UserRecord> for UserDto {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            display_name: record.display_name,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserDto,
}

// ============================================
// Solutions
// ============================================

#[derive(Debug, Deserialize)]
pub struct SolutionListQuery {
    /// Case-insensitive substring match on the name
    pub q: Option<String>,
    /// Include archived solutions
    #[serde(default)]
    pub include_archived: bool,
}

#[derive(Debug, Deserialize)]
pub struct SaveSolutionRequest {
    pub name: String,
    pub description: Option<String>,
    pub pain_points: Option<String>,
}

impl SaveSolutionRequest {
    pub fn into_draft(self) -> SolutionDraft {
        SolutionDraft::default()
            .set(SolutionField::Name, self.name)
            .set(SolutionField::Description, self.description.unwrap_or_default())
            .set(SolutionField::PainPoints, self.pain_points.unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
pub struct SolutionStatusRequest {
    pub is_active: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SolutionDto {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub pain_points: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Solution> for SolutionDto {
    fn from(solution: Solution) -> Self {
        Self {
            id: solution.id,
            name: solution.name,
            description: solution.description,
            pain_points: solution.pain_points,
            is_active: solution.is_active,
            created_at: solution.created_at,
            updated_at: solution.updated_at,
        }
    }
}

// ============================================
// Opportunities
// ============================================

#[derive(Debug, Default, Deserialize)]
pub struct OpportunityListQuery {
    /// Stage filter; absent or `All Stages` means no filter
    pub stage: Option<String>,
    /// Type filter; absent or `All Types` means no filter
    #[serde(rename = "type")]
    pub opportunity_type: Option<String>,
    /// Sort field, defaults to `created_at`
    pub sort: Option<String>,
    /// Sort direction, `asc` or `desc`
    pub dir: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOpportunityRequest {
    pub name: String,
    pub client_name: String,
    pub description: Option<String>,
    pub opportunity_type: String,
    /// Explicit stage; omitted means the type's first stage
    pub stage: Option<String>,
    /// Amount as form text; empty or omitted means null
    pub estimated_value: Option<String>,
}

impl CreateOpportunityRequest {
    pub fn into_draft(self) -> OpportunityDraft {
        let draft = OpportunityDraft::default()
            .set(OpportunityField::Name, self.name)
            .set(OpportunityField::ClientName, self.client_name)
            .set(OpportunityField::Description, self.description.unwrap_or_default())
            .set(OpportunityField::OpportunityType, self.opportunity_type)
            .set(
                OpportunityField::EstimatedValue,
                self.estimated_value.unwrap_or_default(),
            );
        // An explicit stage lands after the type so it survives the
        // reset the type change applies.
        match self.stage {
            Some(stage) => draft.set(OpportunityField::Stage, stage),
            None => draft,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateOpportunityRequest {
    pub name: Option<String>,
    pub client_name: Option<String>,
    pub description: Option<String>,
    pub opportunity_type: Option<String>,
    pub stage: Option<String>,
    pub estimated_value: Option<String>,
}

impl UpdateOpportunityRequest {
    /// Replay the provided fields onto a draft of the stored record.
    ///
    /// Field order matters: the type lands before the stage, so a type
    /// change without an explicit stage resets to the new type's first
    /// stage, while an explicit stage restores any valid pairing.
    pub fn apply_to(self, draft: OpportunityDraft) -> OpportunityDraft {
        let mut draft = draft;
        if let Some(name) = self.name {
            draft = draft.set(OpportunityField::Name, name);
        }
        if let Some(client_name) = self.client_name {
            draft = draft.set(OpportunityField::ClientName, client_name);
        }
        if let Some(description) = self.description {
            draft = draft.set(OpportunityField::Description, description);
        }
        if let Some(opportunity_type) = self.opportunity_type {
            draft = draft.set(OpportunityField::OpportunityType, opportunity_type);
        }
        if let Some(stage) = self.stage {
            draft = draft.set(OpportunityField::Stage, stage);
        }
        if let Some(estimated_value) = self.estimated_value {
            draft = draft.set(OpportunityField::EstimatedValue, estimated_value);
        }
        draft
    }
}

/// Draft pre-filled from a stored opportunity, for partial updates
pub fn draft_from_opportunity(opportunity: &Opportunity) -> OpportunityDraft {
    OpportunityDraft {
        name: opportunity.name.clone(),
        client_name: opportunity.client_name.clone(),
        description: opportunity.description.clone().unwrap_or_default(),
        opportunity_type: opportunity.opportunity_type.as_str().to_string(),
        stage: opportunity.stage.as_str().to_string(),
        estimated_value: opportunity
            .estimated_value
            .map(|v| v.to_string())
            .unwrap_or_default(),
    }
}

#[derive(Debug, Deserialize)]
pub struct LinkSessionRequest {
    /// Session to link; null detaches
    pub discovery_session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OpportunityDto {
    pub id: String,
    pub name: String,
    pub client_name: String,
    pub description: Option<String>,
    pub opportunity_type: String,
    pub stage: String,
    /// Badge category derived from (type, stage)
    pub stage_category: StageCategory,
    pub estimated_value: Option<Decimal>,
    pub discovery_session_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Opportunity> for OpportunityDto {
    fn from(opportunity: Opportunity) -> Self {
        Self {
            stage_category: opportunity.stage_category(),
            id: opportunity.id,
            name: opportunity.name,
            client_name: opportunity.client_name,
            description: opportunity.description,
            opportunity_type: opportunity.opportunity_type.as_str().to_string(),
            stage: opportunity.stage.as_str().to_string(),
            estimated_value: opportunity.estimated_value,
            discovery_session_id: opportunity.discovery_session_id,
            created_at: opportunity.created_at,
            updated_at: opportunity.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StageCountDto {
    pub stage: String,
    pub count: i64,
}

impl From<StageCount> for StageCountDto {
    fn from(count: StageCount) -> Self {
        Self {
            stage: count.stage,
            count: count.count,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TypeCountDto {
    pub opportunity_type: String,
    pub count: i64,
}

impl From<TypeCount> for TypeCountDto {
    fn from(count: TypeCount) -> Self {
        Self {
            opportunity_type: count.opportunity_type,
            count: count.count,
        }
    }
}

/// Summary tallies over the entire unfiltered pipeline
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub stages: Vec<StageCountDto>,
    pub types: Vec<TypeCountDto>,
}

// ============================================
// Discovery sessions
// ============================================

#[derive(Debug, Deserialize)]
pub struct SessionListQuery {
    /// Case-insensitive substring match on client or opportunity name
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveSessionRequest {
    pub client_name: String,
    pub opportunity_name: Option<String>,
    /// ISO date, `YYYY-MM-DD`
    pub session_date: String,
}

impl SaveSessionRequest {
    pub fn into_draft(self) -> SessionDraft {
        SessionDraft::default()
            .set(SessionField::ClientName, self.client_name)
            .set(
                SessionField::OpportunityName,
                self.opportunity_name.unwrap_or_default(),
            )
            .set(SessionField::SessionDate, self.session_date)
    }
}

#[derive(Debug, Deserialize)]
pub struct NotesRequest {
    pub notes: String,
}

#[derive(Debug, Deserialize)]
pub struct AttachTemplateRequest {
    /// Template to attach; null detaches
    pub template_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SectionNotesRequest {
    /// Per-section content keyed by section name
    pub sections: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct LinkSolutionRequest {
    pub solution_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionDto {
    pub id: String,
    pub client_name: String,
    pub opportunity_name: Option<String>,
    pub session_date: NaiveDate,
    pub notes: Option<String>,
    pub template_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DiscoverySession> for SessionDto {
    fn from(session: DiscoverySession) -> Self {
        Self {
            id: session.id,
            client_name: session.client_name,
            opportunity_name: session.opportunity_name,
            session_date: session.session_date,
            notes: session.notes,
            template_id: session.template_id,
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionContentDto {
    pub name: String,
    pub content: String,
}

/// Decoded section notes, in template order
#[derive(Debug, Serialize, Deserialize)]
pub struct SectionNotesResponse {
    pub sections: Vec<SectionContentDto>,
}

/// Outcome of a link/unlink request.
///
/// `already_linked` and `not_linked` are informational, not errors.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkResultDto {
    pub status: String,
    pub message: String,
}

impl From<LinkOutcome> for LinkResultDto {
    fn from(outcome: LinkOutcome) -> Self {
        match outcome {
            LinkOutcome::Linked => Self {
                status: "linked".to_string(),
                message: "Solution linked to session".to_string(),
            },
            LinkOutcome::AlreadyLinked => Self {
                status: "already_linked".to_string(),
                message: "Solution is already linked to this session".to_string(),
            },
        }
    }
}

impl From<UnlinkOutcome> for LinkResultDto {
    fn from(outcome: UnlinkOutcome) -> Self {
        match outcome {
            UnlinkOutcome::Unlinked => Self {
                status: "unlinked".to_string(),
                message: "Solution unlinked from session".to_string(),
            },
            UnlinkOutcome::NotLinked => Self {
                status: "not_linked".to_string(),
                message: "Solution was not linked to this session".to_string(),
            },
        }
    }
}

// ============================================
// Discovery templates
// ============================================

#[derive(Debug, Deserialize)]
pub struct SaveTemplateRequest {
    pub name: String,
    pub sections: Vec<String>,
}

impl SaveTemplateRequest {
    pub fn into_draft(self) -> TemplateDraft {
        let mut draft = TemplateDraft::default().set_name(self.name);
        for (idx, section) in self.sections.into_iter().enumerate() {
            draft = draft.add_section().update_section(idx, section);
        }
        draft
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TemplateDto {
    pub id: String,
    pub name: String,
    pub sections: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DiscoveryTemplate> for TemplateDto {
    fn from(template: DiscoveryTemplate) -> Self {
        Self {
            id: template.id,
            name: template.name,
            sections: template.sections,
            created_at: template.created_at,
            updated_at: template.updated_at,
        }
    }
}

// ============================================
// Dashboard & health
// ============================================

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub active_solutions: i64,
    pub open_opportunities: i64,
    pub discovery_sessions: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}
