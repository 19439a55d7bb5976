//! ServiceFlow Core
//!
//! Pure domain logic for the ServiceFlow sales-operations backend.
//! No I/O lives here: everything in this crate is a function of its
//! inputs, which keeps the pipeline rules, the section-notes codec and
//! the list projections testable without a database or an HTTP stack.
//!
//! # Modules
//!
//! - [`types`] - domain records (solutions, opportunities, discovery
//!   sessions/templates) and the opportunity stage machinery
//! - [`notes`] - the template section-notes codec (`## <section>`
//!   markdown headers to/from per-section content)
//! - [`views`] - filter, sort and search projections for list pages
//! - [`forms`] - immutable form drafts with a validate-then-submit
//!   pipeline
//! - [`error`] - domain error types

pub mod error;
pub mod forms;
pub mod notes;
pub mod types;
pub mod views;

// Re-export main types
pub use error::DomainError;
pub use forms::{
    FieldError, OpportunityDraft, OpportunityField, OpportunityInput, SessionDraft, SessionField,
    SessionInput, SolutionDraft, SolutionField, SolutionInput, TemplateDraft, TemplateInput,
};
pub use notes::{decode_sections, encode_sections};
pub use types::{
    DiscoverySession, DiscoveryTemplate, Opportunity, OpportunityType, SessionSolutionLink,
    Solution, Stage, StageCategory,
};
pub use views::{OpportunityFilter, SortDir, SortField, SortSpec};

/// Core crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
