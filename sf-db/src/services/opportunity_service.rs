//! Opportunity pipeline service
//!
//! Enforces the stage/type pairing on every write. Callers hand in
//! already-validated form input; the service re-checks the domain
//! invariants anyway, because the store will not.

use chrono::Utc;
use sf_core::forms::OpportunityInput;
use sf_core::types::Opportunity;

use crate::entities::new_opportunity;
use crate::error::{DbError, DbResult};
use crate::repos::{OpportunityRepo, SessionRepo};
use crate::validation;

/// Create/update flows for opportunities
#[derive(Clone)]
pub struct OpportunityService {
    opportunities: OpportunityRepo,
    sessions: SessionRepo,
}

impl OpportunityService {
    pub fn new(opportunities: OpportunityRepo, sessions: SessionRepo) -> Self {
        Self {
            opportunities,
            sessions,
        }
    }

    /// Create an opportunity from validated input
    pub async fn create(&self, input: OpportunityInput) -> DbResult<Opportunity> {
        validation::validate_stage_pairing(input.opportunity_type, input.stage)?;
        validation::validate_estimated_value(input.estimated_value)?;

        let opportunity = new_opportunity(input);
        self.opportunities.insert(&opportunity).await?;
        tracing::info!(
            opportunity_id = %opportunity.id,
            stage = %opportunity.stage,
            "opportunity created"
        );
        Ok(opportunity)
    }

    /// Replace the mutable fields of an existing opportunity.
    ///
    /// The input carries the post-change type and stage; the reducer in
    /// `sf_core::forms` has already applied the reset-on-type-change
    /// rule, and the pairing is verified once more here.
    pub async fn update(&self, id: &str, input: OpportunityInput) -> DbResult<Opportunity> {
        validation::validate_stage_pairing(input.opportunity_type, input.stage)?;
        validation::validate_estimated_value(input.estimated_value)?;

        let mut current = self.require(id).await?;
        current.name = input.name;
        current.client_name = input.client_name;
        current.description = input.description;
        current.opportunity_type = input.opportunity_type;
        current.stage = input.stage;
        current.estimated_value = input.estimated_value;
        current.updated_at = Utc::now();

        self.opportunities.update(&current).await?;
        Ok(current)
    }

    /// Attach the opportunity to a discovery session, or detach it.
    ///
    /// The session must exist; at most one is linked at a time.
    pub async fn set_discovery_session(
        &self,
        id: &str,
        session_id: Option<&str>,
    ) -> DbResult<Opportunity> {
        if let Some(session_id) = session_id {
            if self.sessions.get(session_id).await?.is_none() {
                return Err(DbError::NotFound {
                    entity: "discovery session",
                    id: session_id.to_string(),
                });
            }
        }
        self.opportunities.set_discovery_session(id, session_id).await?;
        self.require(id).await
    }

    async fn require(&self, id: &str) -> DbResult<Opportunity> {
        self.opportunities.get(id).await?.ok_or_else(|| DbError::NotFound {
            entity: "opportunity",
            id: id.to_string(),
        })
    }
}
