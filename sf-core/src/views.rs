//! List projections: filter, sort, search
//!
//! Pure derivations from a base collection to the sequence a list page
//! displays. No mutation, no I/O. Summary tallies are deliberately NOT
//! computed here from a filtered view - they come from unfiltered
//! aggregates so that changing a filter never changes the summary
//! widgets.

use std::cmp::Ordering;

use crate::error::{DomainError, DomainResult};
use crate::types::{Opportunity, OpportunityType, Stage};

/// Sentinel filter labels, treated the same as an absent parameter
pub const ALL_STAGES: &str = "All Stages";
pub const ALL_TYPES: &str = "All Types";

/// Exact-match filter selectors for the opportunity list.
///
/// `None` means "no filter" for that field; active selectors combine
/// with logical AND.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpportunityFilter {
    pub stage: Option<Stage>,
    pub opportunity_type: Option<OpportunityType>,
}

impl OpportunityFilter {
    /// Parse filter selectors from their query/display forms.
    ///
    /// Absent values and the `All Stages` / `All Types` sentinels map to
    /// "no filter".
    pub fn parse(stage: Option<&str>, opportunity_type: Option<&str>) -> DomainResult<Self> {
        let stage = match stage {
            None | Some(ALL_STAGES) => None,
            Some(s) => Some(Stage::parse(s)?),
        };
        let opportunity_type = match opportunity_type {
            None | Some(ALL_TYPES) => None,
            Some(t) => Some(OpportunityType::parse(t)?),
        };
        Ok(Self {
            stage,
            opportunity_type,
        })
    }

    /// Whether an opportunity passes every active selector
    pub fn matches(&self, opportunity: &Opportunity) -> bool {
        if let Some(stage) = self.stage {
            if opportunity.stage != stage {
                return false;
            }
        }
        if let Some(ty) = self.opportunity_type {
            if opportunity.opportunity_type != ty {
                return false;
            }
        }
        true
    }

    /// Whether any selector is active
    pub fn is_active(&self) -> bool {
        self.stage.is_some() || self.opportunity_type.is_some()
    }
}

/// Sortable opportunity fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    ClientName,
    Stage,
    EstimatedValue,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::ClientName => "client_name",
            SortField::Stage => "stage",
            SortField::EstimatedValue => "estimated_value",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "name" => Ok(SortField::Name),
            "client_name" => Ok(SortField::ClientName),
            "stage" => Ok(SortField::Stage),
            "estimated_value" => Ok(SortField::EstimatedValue),
            "created_at" => Ok(SortField::CreatedAt),
            "updated_at" => Ok(SortField::UpdatedAt),
            other => Err(DomainError::UnknownSortField(other.to_string())),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "desc" => SortDir::Desc,
            _ => SortDir::Asc,
        }
    }
}

/// A sort selector: field plus direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub dir: SortDir,
}

impl Default for SortSpec {
    /// Newest first, matching the list page's initial view
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            dir: SortDir::Desc,
        }
    }
}

impl SortSpec {
    /// Canonical query form, used for cache keys
    pub fn canonical(&self) -> String {
        format!("{}:{}", self.field.as_str(), self.dir.as_str())
    }
}

/// Compare two opportunities under a sort field's natural ordering.
///
/// Strings compare lexicographically, amounts numerically, timestamps
/// chronologically. A null `estimated_value` sorts as the lowest value;
/// descending order is the exact reverse, so nulls land last there.
fn compare(a: &Opportunity, b: &Opportunity, field: SortField) -> Ordering {
    match field {
        SortField::Name => a.name.cmp(&b.name),
        SortField::ClientName => a.client_name.cmp(&b.client_name),
        SortField::Stage => a.stage.as_str().cmp(b.stage.as_str()),
        SortField::EstimatedValue => a.estimated_value.cmp(&b.estimated_value),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

/// Project a base collection into the displayed sequence
pub fn project(
    mut items: Vec<Opportunity>,
    filter: &OpportunityFilter,
    sort: SortSpec,
) -> Vec<Opportunity> {
    items.retain(|o| filter.matches(o));
    items.sort_by(|a, b| {
        let ord = compare(a, b, sort.field);
        match sort.dir {
            SortDir::Asc => ord,
            SortDir::Desc => ord.reverse(),
        }
    });
    items
}

/// Case-insensitive substring containment, for text-search pickers
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
