//! Discovery session and template records

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A recorded client conversation
///
/// Notes are a single flat string; when a template is attached they are
/// structured per-section through the codec in [`crate::notes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverySession {
    pub id: String,
    pub client_name: String,
    pub opportunity_name: Option<String>,
    pub session_date: NaiveDate,
    pub notes: Option<String>,
    /// At most one attached template
    pub template_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A named, ordered list of section headings
///
/// Section order is meaningful: it drives both the rendered form and
/// the codec's header scanning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryTemplate {
    pub id: String,
    /// Unique, non-empty display name
    pub name: String,
    pub sections: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Many-to-many association between a session and a solution
///
/// The `(discovery_session_id, solution_id)` pair is unique; re-linking
/// is an informational no-op rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSolutionLink {
    pub discovery_session_id: String,
    pub solution_id: String,
    pub created_at: DateTime<Utc>,
}
