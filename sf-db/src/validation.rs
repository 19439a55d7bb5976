//! Write-time domain invariants
//!
//! The store only enforces uniqueness and foreign keys, so every
//! domain-specific invariant is checked here before a statement is
//! issued. Services call these guards on every create and update.
//!
//! # Rules
//!
//! 1. An opportunity's stage must belong to its type's stage set.
//! 2. Estimated values are non-negative (or absent).
//! 3. Template sections are distinct, non-empty names.

use rust_decimal::Decimal;
use sf_core::types::{OpportunityType, Stage};

use crate::error::{DbError, DbResult};

/// Rule 1: stage belongs to the type's stage set
pub fn validate_stage_pairing(
    opportunity_type: OpportunityType,
    stage: Stage,
) -> DbResult<()> {
    if !opportunity_type.allows(stage) {
        return Err(DbError::Validation(format!(
            "Stage '{}' is not valid for opportunity type '{}'",
            stage, opportunity_type
        )));
    }
    Ok(())
}

/// Rule 2: estimated value is non-negative or absent
pub fn validate_estimated_value(value: Option<Decimal>) -> DbResult<()> {
    if let Some(amount) = value {
        if amount.is_sign_negative() {
            return Err(DbError::Validation(format!(
                "Estimated value must not be negative, got {amount}"
            )));
        }
    }
    Ok(())
}

/// Rule 3: sections are distinct non-empty names
pub fn validate_sections(sections: &[String]) -> DbResult<()> {
    for (idx, section) in sections.iter().enumerate() {
        if section.trim().is_empty() {
            return Err(DbError::Validation(
                "Template sections must not be empty".to_string(),
            ));
        }
        if sections[..idx].contains(section) {
            return Err(DbError::Validation(format!(
                "Duplicate template section: {section}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_stage_pairing() {
        assert!(validate_stage_pairing(OpportunityType::Concept, Stage::Discovery).is_ok());
        assert!(validate_stage_pairing(OpportunityType::PaidAudit, Stage::ClosedWon).is_ok());
        assert!(validate_stage_pairing(OpportunityType::Concept, Stage::AuditPaid).is_err());
        assert!(validate_stage_pairing(OpportunityType::PaidAudit, Stage::Proposal).is_err());
    }

    #[test]
    fn test_validate_estimated_value() {
        assert!(validate_estimated_value(None).is_ok());
        assert!(validate_estimated_value(Some(Decimal::ZERO)).is_ok());
        assert!(validate_estimated_value(Some(Decimal::from(5000))).is_ok());
        assert!(validate_estimated_value(Some(Decimal::from(-1))).is_err());
    }

    #[test]
    fn test_validate_sections() {
        let ok = vec!["Goals".to_string(), "Pain Points".to_string()];
        assert!(validate_sections(&ok).is_ok());

        let empty = vec!["Goals".to_string(), "  ".to_string()];
        assert!(validate_sections(&empty).is_err());

        let dup = vec!["Goals".to_string(), "Goals".to_string()];
        assert!(validate_sections(&dup).is_err());
    }
}
