//! Opportunity pipeline types
//!
//! An opportunity is typed as `Concept` or `Paid Audit`, and each type
//! carries its own ladder of stages. The pairing is a hard invariant:
//! an opportunity's stage must always belong to the stage set of its
//! current type, and switching type resets the stage to the new type's
//! first rung unless the caller explicitly picks a valid one.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Opportunity type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpportunityType {
    Concept,
    #[serde(rename = "Paid Audit")]
    PaidAudit,
}

/// Stage ladder for `Concept` opportunities, in pipeline order
pub const CONCEPT_STAGES: [Stage; 5] = [
    Stage::Discovery,
    Stage::Proposal,
    Stage::AgreementSent,
    Stage::ClosedWon,
    Stage::ClosedLost,
];

/// Stage ladder for `Paid Audit` opportunities, in pipeline order
pub const AUDIT_STAGES: [Stage; 6] = [
    Stage::AuditProposed,
    Stage::AuditSigned,
    Stage::AuditPaid,
    Stage::AuditDelivered,
    Stage::ClosedWon,
    Stage::ClosedLost,
];

impl OpportunityType {
    /// All opportunity types
    pub const ALL: [OpportunityType; 2] = [OpportunityType::Concept, OpportunityType::PaidAudit];

    /// Display / storage form
    pub fn as_str(&self) -> &'static str {
        match self {
            OpportunityType::Concept => "Concept",
            OpportunityType::PaidAudit => "Paid Audit",
        }
    }

    /// Parse from the display / storage form
    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "Concept" => Ok(OpportunityType::Concept),
            "Paid Audit" => Ok(OpportunityType::PaidAudit),
            other => Err(DomainError::UnknownOpportunityType(other.to_string())),
        }
    }

    /// The stage set for this type, in pipeline order
    pub fn stages(&self) -> &'static [Stage] {
        match self {
            OpportunityType::Concept => &CONCEPT_STAGES,
            OpportunityType::PaidAudit => &AUDIT_STAGES,
        }
    }

    /// First rung of this type's ladder
    pub fn default_stage(&self) -> Stage {
        self.stages()[0]
    }

    /// Whether `stage` belongs to this type's stage set
    pub fn allows(&self, stage: Stage) -> bool {
        self.stages().contains(&stage)
    }
}

impl std::fmt::Display for OpportunityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pipeline stage
///
/// The union of both ladders; validity against a type is checked via
/// [`OpportunityType::allows`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Discovery,
    Proposal,
    #[serde(rename = "Agreement Sent")]
    AgreementSent,
    #[serde(rename = "Audit Proposed")]
    AuditProposed,
    #[serde(rename = "Audit Signed")]
    AuditSigned,
    #[serde(rename = "Audit Paid")]
    AuditPaid,
    #[serde(rename = "Audit Delivered")]
    AuditDelivered,
    #[serde(rename = "Closed Won")]
    ClosedWon,
    #[serde(rename = "Closed Lost")]
    ClosedLost,
}

impl Stage {
    /// Display / storage form
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Discovery => "Discovery",
            Stage::Proposal => "Proposal",
            Stage::AgreementSent => "Agreement Sent",
            Stage::AuditProposed => "Audit Proposed",
            Stage::AuditSigned => "Audit Signed",
            Stage::AuditPaid => "Audit Paid",
            Stage::AuditDelivered => "Audit Delivered",
            Stage::ClosedWon => "Closed Won",
            Stage::ClosedLost => "Closed Lost",
        }
    }

    /// Parse from the display / storage form
    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "Discovery" => Ok(Stage::Discovery),
            "Proposal" => Ok(Stage::Proposal),
            "Agreement Sent" => Ok(Stage::AgreementSent),
            "Audit Proposed" => Ok(Stage::AuditProposed),
            "Audit Signed" => Ok(Stage::AuditSigned),
            "Audit Paid" => Ok(Stage::AuditPaid),
            "Audit Delivered" => Ok(Stage::AuditDelivered),
            "Closed Won" => Ok(Stage::ClosedWon),
            "Closed Lost" => Ok(Stage::ClosedLost),
            other => Err(DomainError::UnknownStage(other.to_string())),
        }
    }

    /// Whether the stage is terminal (won or lost)
    pub fn is_closed(&self) -> bool {
        matches!(self, Stage::ClosedWon | Stage::ClosedLost)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the stage an opportunity ends up in after a create or update.
///
/// `current` is the (type, stage) pair before the change (`None` on
/// create), `requested` the stage the caller explicitly supplied, if any.
///
/// Rules:
/// - an explicit stage must belong to `new_type`'s set, otherwise the
///   change is rejected;
/// - without an explicit stage, a type change resets to the new type's
///   first stage;
/// - without an explicit stage and without a type change, the current
///   stage is kept.
pub fn resolve_stage(
    new_type: OpportunityType,
    current: Option<(OpportunityType, Stage)>,
    requested: Option<Stage>,
) -> DomainResult<Stage> {
    match requested {
        Some(stage) => {
            if new_type.allows(stage) {
                Ok(stage)
            } else {
                Err(DomainError::StageTypeMismatch {
                    stage: stage.as_str().to_string(),
                    opportunity_type: new_type.as_str().to_string(),
                })
            }
        }
        None => match current {
            Some((current_type, current_stage)) if current_type == new_type => Ok(current_stage),
            _ => Ok(new_type.default_stage()),
        },
    }
}

/// Badge category of a (type, stage) pair, for row styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageCategory {
    /// Closed Won
    Won,
    /// Closed Lost
    Lost,
    /// Earliest open stage of either ladder
    Qualifying,
    /// Mid-pipeline (proposal sent / audit signed)
    Advancing,
    /// Audit paid, work not yet delivered
    Paid,
    /// Waiting on the client (agreement sent / audit delivered)
    Awaiting,
    /// Anything that does not pair up
    Other,
}

/// Lookup table backing [`stage_category`]
const STAGE_CATEGORIES: &[((OpportunityType, Stage), StageCategory)] = &[
    ((OpportunityType::Concept, Stage::Discovery), StageCategory::Qualifying),
    ((OpportunityType::Concept, Stage::Proposal), StageCategory::Advancing),
    ((OpportunityType::Concept, Stage::AgreementSent), StageCategory::Awaiting),
    ((OpportunityType::Concept, Stage::ClosedWon), StageCategory::Won),
    ((OpportunityType::Concept, Stage::ClosedLost), StageCategory::Lost),
    ((OpportunityType::PaidAudit, Stage::AuditProposed), StageCategory::Qualifying),
    ((OpportunityType::PaidAudit, Stage::AuditSigned), StageCategory::Advancing),
    ((OpportunityType::PaidAudit, Stage::AuditPaid), StageCategory::Paid),
    ((OpportunityType::PaidAudit, Stage::AuditDelivered), StageCategory::Awaiting),
    ((OpportunityType::PaidAudit, Stage::ClosedWon), StageCategory::Won),
    ((OpportunityType::PaidAudit, Stage::ClosedLost), StageCategory::Lost),
];

/// Badge category for a (type, stage) pair.
///
/// Pure table lookup with an `Other` fallback for pairings outside the
/// invariant (e.g. a Concept opportunity carrying an audit stage).
pub fn stage_category(opportunity_type: OpportunityType, stage: Stage) -> StageCategory {
    STAGE_CATEGORIES
        .iter()
        .find(|((t, s), _)| *t == opportunity_type && *s == stage)
        .map(|(_, category)| *category)
        .unwrap_or(StageCategory::Other)
}

/// A tracked potential sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: String,
    pub name: String,
    pub client_name: String,
    pub description: Option<String>,
    pub opportunity_type: OpportunityType,
    pub stage: Stage,
    pub estimated_value: Option<Decimal>,
    pub discovery_session_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Opportunity {
    /// Whether the stage/type pairing invariant holds
    pub fn stage_is_valid(&self) -> bool {
        self.opportunity_type.allows(self.stage)
    }

    /// Badge category for this row
    pub fn stage_category(&self) -> StageCategory {
        stage_category(self.opportunity_type, self.stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_parse_roundtrip() {
        for ty in OpportunityType::ALL {
            assert_eq!(OpportunityType::parse(ty.as_str()).unwrap(), ty);
        }
        assert!(OpportunityType::parse("Retainer").is_err());
    }

    #[test]
    fn test_stage_parse_roundtrip() {
        for stage in CONCEPT_STAGES.iter().chain(AUDIT_STAGES.iter()) {
            assert_eq!(Stage::parse(stage.as_str()).unwrap(), *stage);
        }
        assert!(Stage::parse("Negotiation").is_err());
    }

    #[test]
    fn test_default_stages() {
        assert_eq!(OpportunityType::Concept.default_stage(), Stage::Discovery);
        assert_eq!(
            OpportunityType::PaidAudit.default_stage(),
            Stage::AuditProposed
        );
    }

    #[test]
    fn test_stage_sets_are_disjoint_except_closed() {
        for stage in CONCEPT_STAGES {
            if !stage.is_closed() {
                assert!(!OpportunityType::PaidAudit.allows(stage));
            }
        }
        for stage in AUDIT_STAGES {
            if !stage.is_closed() {
                assert!(!OpportunityType::Concept.allows(stage));
            }
        }
        assert!(OpportunityType::Concept.allows(Stage::ClosedWon));
        assert!(OpportunityType::PaidAudit.allows(Stage::ClosedWon));
    }

    #[test]
    fn test_resolve_stage_on_create() {
        // No explicit stage: first rung of the ladder
        assert_eq!(
            resolve_stage(OpportunityType::Concept, None, None).unwrap(),
            Stage::Discovery
        );
        // Explicit valid stage wins
        assert_eq!(
            resolve_stage(OpportunityType::Concept, None, Some(Stage::Proposal)).unwrap(),
            Stage::Proposal
        );
        // Explicit invalid stage rejected
        assert!(resolve_stage(OpportunityType::Concept, None, Some(Stage::AuditPaid)).is_err());
    }

    #[test]
    fn test_resolve_stage_type_change_resets() {
        let current = Some((OpportunityType::Concept, Stage::Proposal));
        assert_eq!(
            resolve_stage(OpportunityType::PaidAudit, current, None).unwrap(),
            Stage::AuditProposed
        );
    }

    #[test]
    fn test_resolve_stage_keeps_current_without_type_change() {
        let current = Some((OpportunityType::Concept, Stage::AgreementSent));
        assert_eq!(
            resolve_stage(OpportunityType::Concept, current, None).unwrap(),
            Stage::AgreementSent
        );
    }

    #[test]
    fn test_resolve_stage_restores_explicit_pairing() {
        // Caller switching type and supplying a valid stage keeps it
        let current = Some((OpportunityType::Concept, Stage::Proposal));
        assert_eq!(
            resolve_stage(OpportunityType::PaidAudit, current, Some(Stage::AuditSigned)).unwrap(),
            Stage::AuditSigned
        );
    }

    #[test]
    fn test_stage_category_exhaustive_over_valid_pairs() {
        // Every valid (type, stage) pair maps to a non-fallback category
        for ty in OpportunityType::ALL {
            for stage in ty.stages() {
                assert_ne!(stage_category(ty, *stage), StageCategory::Other);
            }
        }
    }

    #[test]
    fn test_stage_category_table() {
        use OpportunityType::*;
        assert_eq!(stage_category(Concept, Stage::ClosedWon), StageCategory::Won);
        assert_eq!(stage_category(PaidAudit, Stage::ClosedLost), StageCategory::Lost);
        assert_eq!(stage_category(Concept, Stage::Discovery), StageCategory::Qualifying);
        assert_eq!(stage_category(PaidAudit, Stage::AuditProposed), StageCategory::Qualifying);
        assert_eq!(stage_category(PaidAudit, Stage::AuditPaid), StageCategory::Paid);
        assert_eq!(stage_category(Concept, Stage::AgreementSent), StageCategory::Awaiting);
    }

    #[test]
    fn test_stage_category_fallback() {
        // Mismatched pairing falls back instead of panicking
        assert_eq!(
            stage_category(OpportunityType::Concept, Stage::AuditPaid),
            StageCategory::Other
        );
    }

    #[test]
    fn test_serde_display_forms() {
        let json = serde_json::to_string(&OpportunityType::PaidAudit).unwrap();
        assert_eq!(json, "\"Paid Audit\"");
        let json = serde_json::to_string(&Stage::AgreementSent).unwrap();
        assert_eq!(json, "\"Agreement Sent\"");
    }
}
