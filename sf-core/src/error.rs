//! Error types for ServiceFlow core

use thiserror::Error;

/// Domain rule violations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Unrecognized opportunity type string
    #[error("Unknown opportunity type: {0}")]
    UnknownOpportunityType(String),

    /// Unrecognized stage string
    #[error("Unknown stage: {0}")]
    UnknownStage(String),

    /// Stage does not belong to the stage set of the opportunity type
    #[error("Stage '{stage}' is not valid for opportunity type '{opportunity_type}'")]
    StageTypeMismatch {
        stage: String,
        opportunity_type: String,
    },

    /// Sections must be distinct non-empty names
    #[error("Duplicate template section: {0}")]
    DuplicateSection(String),

    /// Unrecognized sort field name
    #[error("Unknown sort field: {0}")]
    UnknownSortField(String),
}

/// Core result type
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DomainError::StageTypeMismatch {
            stage: "Audit Paid".to_string(),
            opportunity_type: "Concept".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Stage 'Audit Paid' is not valid for opportunity type 'Concept'"
        );
    }
}
