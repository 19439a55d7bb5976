//! Solution catalog record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reusable service offering, active or archived
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub id: String,
    /// Unique, non-empty display name
    pub name: String,
    pub description: Option<String>,
    pub pain_points: Option<String>,
    /// Archived solutions stay in the store with `is_active = false`
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Solution {
    /// Case-insensitive substring match against the name, for pickers
    pub fn matches_search(&self, term: &str) -> bool {
        crate::views::contains_ci(&self.name, term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn solution(name: &str) -> Solution {
        Solution {
            id: "sol_1".to_string(),
            name: name.to_string(),
            description: None,
            pain_points: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_matches_search_case_insensitive() {
        let s = solution("Cloud Migration Audit");
        assert!(s.matches_search("cloud"));
        assert!(s.matches_search("MIGRATION"));
        assert!(s.matches_search(""));
        assert!(!s.matches_search("retainer"));
    }
}
