//! Domain record types
//!
//! The records mirror the backing tables one-to-one. Identifiers are
//! opaque strings; timestamps are UTC instants.

mod discovery;
mod opportunity;
mod solution;

pub use discovery::{DiscoverySession, DiscoveryTemplate, SessionSolutionLink};
pub use opportunity::{
    resolve_stage, stage_category, Opportunity, OpportunityType, Stage, StageCategory,
    AUDIT_STAGES, CONCEPT_STAGES,
};
pub use solution::Solution;
