//! Form drafts and validation
//!
//! Form state is modeled as an immutable value updated through explicit
//! reducer methods, so the validate-then-submit pipeline is testable on
//! its own. A draft holds fields as entered (text), `validate()` either
//! produces a typed input ready for persistence or a list of
//! field-level errors that block submission.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::types::{resolve_stage, OpportunityType, Stage};

/// A validation failure attached to a single field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn require_min_chars(
    errors: &mut Vec<FieldError>,
    field: &str,
    value: &str,
    min: usize,
    message: &str,
) {
    if value.trim().chars().count() < min {
        errors.push(FieldError::new(field, message));
    }
}

fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// ============================================
// Solution
// ============================================

/// Solution form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionField {
    Name,
    Description,
    PainPoints,
}

/// Solution form state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolutionDraft {
    pub name: String,
    pub description: String,
    pub pain_points: String,
}

/// Validated solution fields, ready for persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionInput {
    pub name: String,
    pub description: Option<String>,
    pub pain_points: Option<String>,
}

impl SolutionDraft {
    /// Apply one keystroke's worth of change, returning the new state
    pub fn set(mut self, field: SolutionField, value: String) -> Self {
        match field {
            SolutionField::Name => self.name = value,
            SolutionField::Description => self.description = value,
            SolutionField::PainPoints => self.pain_points = value,
        }
        self
    }

    pub fn validate(&self) -> Result<SolutionInput, Vec<FieldError>> {
        let mut errors = Vec::new();
        require_min_chars(
            &mut errors,
            "name",
            &self.name,
            2,
            "Name must be at least 2 characters",
        );
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(SolutionInput {
            name: self.name.trim().to_string(),
            description: optional_text(&self.description),
            pain_points: optional_text(&self.pain_points),
        })
    }
}

// ============================================
// Opportunity
// ============================================

/// Opportunity form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpportunityField {
    Name,
    ClientName,
    Description,
    OpportunityType,
    Stage,
    EstimatedValue,
}

/// Opportunity form state
///
/// Changing the type re-derives the stage to the new type's first rung;
/// an explicit later `Stage` edit can then restore any valid pairing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpportunityDraft {
    pub name: String,
    pub client_name: String,
    pub description: String,
    pub opportunity_type: String,
    pub stage: String,
    pub estimated_value: String,
}

/// Validated opportunity fields, ready for persistence
#[derive(Debug, Clone, PartialEq)]
pub struct OpportunityInput {
    pub name: String,
    pub client_name: String,
    pub description: Option<String>,
    pub opportunity_type: OpportunityType,
    pub stage: Stage,
    pub estimated_value: Option<Decimal>,
}

impl Default for OpportunityDraft {
    fn default() -> Self {
        let ty = OpportunityType::Concept;
        Self {
            name: String::new(),
            client_name: String::new(),
            description: String::new(),
            opportunity_type: ty.as_str().to_string(),
            stage: ty.default_stage().as_str().to_string(),
            estimated_value: String::new(),
        }
    }
}

impl OpportunityDraft {
    /// Apply one keystroke's worth of change, returning the new state
    pub fn set(mut self, field: OpportunityField, value: String) -> Self {
        match field {
            OpportunityField::Name => self.name = value,
            OpportunityField::ClientName => self.client_name = value,
            OpportunityField::Description => self.description = value,
            OpportunityField::Stage => self.stage = value,
            OpportunityField::EstimatedValue => self.estimated_value = value,
            OpportunityField::OpportunityType => {
                let previous = OpportunityType::parse(&self.opportunity_type).ok();
                let next = OpportunityType::parse(&value).ok();
                self.opportunity_type = value;
                if let Some(next) = next {
                    if previous != Some(next) {
                        self.stage = next.default_stage().as_str().to_string();
                    }
                }
            }
        }
        self
    }

    pub fn validate(&self) -> Result<OpportunityInput, Vec<FieldError>> {
        let mut errors = Vec::new();
        require_min_chars(
            &mut errors,
            "name",
            &self.name,
            2,
            "Name must be at least 2 characters",
        );
        require_min_chars(
            &mut errors,
            "client_name",
            &self.client_name,
            2,
            "Client name must be at least 2 characters",
        );

        let opportunity_type = match OpportunityType::parse(self.opportunity_type.trim()) {
            Ok(ty) => Some(ty),
            Err(_) => {
                errors.push(FieldError::new(
                    "opportunity_type",
                    "Opportunity type must be Concept or Paid Audit",
                ));
                None
            }
        };

        let stage = match (opportunity_type, self.stage.trim()) {
            (Some(ty), "") => Some(ty.default_stage()),
            (Some(ty), raw) => match Stage::parse(raw).and_then(|s| resolve_stage(ty, None, Some(s)))
            {
                Ok(stage) => Some(stage),
                Err(e) => {
                    errors.push(FieldError::new("stage", e.to_string()));
                    None
                }
            },
            (None, _) => None,
        };

        // Empty input maps to null, not zero
        let estimated_value = match self.estimated_value.trim() {
            "" => None,
            raw => match Decimal::from_str(raw) {
                Ok(value) if value.is_sign_negative() => {
                    errors.push(FieldError::new(
                        "estimated_value",
                        "Estimated value must not be negative",
                    ));
                    None
                }
                Ok(value) => Some(value),
                Err(_) => {
                    errors.push(FieldError::new(
                        "estimated_value",
                        "Estimated value must be a number",
                    ));
                    None
                }
            },
        };

        let (Some(opportunity_type), Some(stage)) = (opportunity_type, stage) else {
            return Err(errors);
        };
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(OpportunityInput {
            name: self.name.trim().to_string(),
            client_name: self.client_name.trim().to_string(),
            description: optional_text(&self.description),
            opportunity_type,
            stage,
            estimated_value,
        })
    }
}

// ============================================
// Discovery session
// ============================================

/// Discovery session form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionField {
    ClientName,
    OpportunityName,
    SessionDate,
}

/// Discovery session form state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionDraft {
    pub client_name: String,
    pub opportunity_name: String,
    /// ISO date, `YYYY-MM-DD`
    pub session_date: String,
}

/// Validated session fields, ready for persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInput {
    pub client_name: String,
    pub opportunity_name: Option<String>,
    pub session_date: NaiveDate,
}

impl SessionDraft {
    /// Apply one keystroke's worth of change, returning the new state
    pub fn set(mut self, field: SessionField, value: String) -> Self {
        match field {
            SessionField::ClientName => self.client_name = value,
            SessionField::OpportunityName => self.opportunity_name = value,
            SessionField::SessionDate => self.session_date = value,
        }
        self
    }

    pub fn validate(&self) -> Result<SessionInput, Vec<FieldError>> {
        let mut errors = Vec::new();
        require_min_chars(
            &mut errors,
            "client_name",
            &self.client_name,
            1,
            "Client name is required",
        );

        let session_date = match NaiveDate::parse_from_str(self.session_date.trim(), "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                errors.push(FieldError::new(
                    "session_date",
                    "Session date must be a valid date (YYYY-MM-DD)",
                ));
                None
            }
        };

        let Some(session_date) = session_date else {
            return Err(errors);
        };
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(SessionInput {
            client_name: self.client_name.trim().to_string(),
            opportunity_name: optional_text(&self.opportunity_name),
            session_date,
        })
    }
}

// ============================================
// Discovery template
// ============================================

/// Discovery template form state
///
/// Sections keep insertion order; the reducer methods mirror the
/// add/remove/update row controls of the template editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateDraft {
    pub name: String,
    pub sections: Vec<String>,
}

/// Validated template fields, ready for persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateInput {
    pub name: String,
    pub sections: Vec<String>,
}

impl TemplateDraft {
    pub fn set_name(mut self, value: String) -> Self {
        self.name = value;
        self
    }

    pub fn add_section(mut self) -> Self {
        self.sections.push(String::new());
        self
    }

    pub fn remove_section(mut self, index: usize) -> Self {
        if index < self.sections.len() {
            self.sections.remove(index);
        }
        self
    }

    pub fn update_section(mut self, index: usize, value: String) -> Self {
        if let Some(section) = self.sections.get_mut(index) {
            *section = value;
        }
        self
    }

    pub fn validate(&self) -> Result<TemplateInput, Vec<FieldError>> {
        let mut errors = Vec::new();
        require_min_chars(&mut errors, "name", &self.name, 1, "Template name is required");

        // Blank section rows are dropped, duplicates are rejected
        let mut sections: Vec<String> = Vec::new();
        for section in &self.sections {
            let trimmed = section.trim();
            if trimmed.is_empty() {
                continue;
            }
            if sections.iter().any(|existing| existing == trimmed) {
                errors.push(FieldError::new(
                    "sections",
                    format!("Duplicate section: {trimmed}"),
                ));
                continue;
            }
            sections.push(trimmed.to_string());
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(TemplateInput {
            name: self.name.trim().to_string(),
            sections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solution_draft_requires_name() {
        let errors = SolutionDraft::default().validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "name");

        // One character is still too short
        let draft = SolutionDraft::default().set(SolutionField::Name, "X".to_string());
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_solution_draft_empty_optionals_become_null() {
        let input = SolutionDraft::default()
            .set(SolutionField::Name, "Cloud Audit".to_string())
            .set(SolutionField::Description, "   ".to_string())
            .validate()
            .unwrap();
        assert_eq!(input.name, "Cloud Audit");
        assert_eq!(input.description, None);
        assert_eq!(input.pain_points, None);
    }

    #[test]
    fn test_opportunity_draft_defaults() {
        let draft = OpportunityDraft::default();
        assert_eq!(draft.opportunity_type, "Concept");
        assert_eq!(draft.stage, "Discovery");
    }

    #[test]
    fn test_opportunity_type_change_rederives_stage() {
        let draft = OpportunityDraft::default()
            .set(OpportunityField::OpportunityType, "Paid Audit".to_string());
        assert_eq!(draft.stage, "Audit Proposed");

        // Setting the same type again keeps an explicitly chosen stage
        let draft = draft
            .set(OpportunityField::Stage, "Audit Signed".to_string())
            .set(OpportunityField::OpportunityType, "Paid Audit".to_string());
        assert_eq!(draft.stage, "Audit Signed");
    }

    #[test]
    fn test_opportunity_stage_must_match_type() {
        let draft = OpportunityDraft::default()
            .set(OpportunityField::Name, "Website Redesign".to_string())
            .set(OpportunityField::ClientName, "Acme".to_string())
            .set(OpportunityField::Stage, "Audit Paid".to_string());
        let errors = draft.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "stage"));
    }

    #[test]
    fn test_opportunity_estimated_value_parsing() {
        let base = OpportunityDraft::default()
            .set(OpportunityField::Name, "Website Redesign".to_string())
            .set(OpportunityField::ClientName, "Acme".to_string());

        // Empty maps to null, not zero
        let input = base.clone().validate().unwrap();
        assert_eq!(input.estimated_value, None);

        let input = base
            .clone()
            .set(OpportunityField::EstimatedValue, "5000".to_string())
            .validate()
            .unwrap();
        assert_eq!(input.estimated_value, Some(Decimal::from(5000)));

        let errors = base
            .clone()
            .set(OpportunityField::EstimatedValue, "a lot".to_string())
            .validate()
            .unwrap_err();
        assert!(errors.iter().any(|e| e.field == "estimated_value"));

        let errors = base
            .set(OpportunityField::EstimatedValue, "-50".to_string())
            .validate()
            .unwrap_err();
        assert!(errors.iter().any(|e| e.field == "estimated_value"));
    }

    #[test]
    fn test_session_draft_validation() {
        let errors = SessionDraft::default().validate().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "client_name"));
        assert!(errors.iter().any(|e| e.field == "session_date"));

        let input = SessionDraft::default()
            .set(SessionField::ClientName, "Acme".to_string())
            .set(SessionField::SessionDate, "2025-03-14".to_string())
            .validate()
            .unwrap();
        assert_eq!(input.session_date, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
        assert_eq!(input.opportunity_name, None);
    }

    #[test]
    fn test_template_draft_drops_blank_sections() {
        let input = TemplateDraft::default()
            .set_name("Standard Discovery".to_string())
            .add_section()
            .update_section(0, "Goals".to_string())
            .add_section()
            .add_section()
            .update_section(2, "Pain Points".to_string())
            .validate()
            .unwrap();
        assert_eq!(input.sections, vec!["Goals", "Pain Points"]);
    }

    #[test]
    fn test_template_draft_rejects_duplicate_sections() {
        let errors = TemplateDraft::default()
            .set_name("Standard Discovery".to_string())
            .add_section()
            .update_section(0, "Goals".to_string())
            .add_section()
            .update_section(1, "Goals".to_string())
            .validate()
            .unwrap_err();
        assert!(errors.iter().any(|e| e.field == "sections"));
    }

    #[test]
    fn test_template_remove_section_out_of_range_is_noop() {
        let draft = TemplateDraft::default().add_section().remove_section(5);
        assert_eq!(draft.sections.len(), 1);
    }
}
