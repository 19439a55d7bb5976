//! Discovery session and template row mapping

use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::Row;
use sf_core::forms::{SessionInput, TemplateInput};
use sf_core::types::{DiscoverySession, DiscoveryTemplate, SessionSolutionLink};

use super::{date_from_sql, new_id, ts_from_sql, Record};

impl Record for DiscoverySession {
    const TABLE: &'static str = "discovery_sessions";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for DiscoveryTemplate {
    const TABLE: &'static str = "discovery_templates";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for SessionSolutionLink {
    const TABLE: &'static str = "session_solutions";

    fn id(&self) -> &str {
        &self.discovery_session_id
    }
}

pub(crate) const SESSION_COLUMNS: &str =
    "id, client_name, opportunity_name, session_date, notes, template_id, created_at, updated_at";

pub(crate) const TEMPLATE_COLUMNS: &str = "id, name, sections, created_at, updated_at";

/// Build a fresh discovery session from validated form input
pub fn new_session(input: SessionInput) -> DiscoverySession {
    let now = Utc::now();
    DiscoverySession {
        id: new_id("dsn"),
        client_name: input.client_name,
        opportunity_name: input.opportunity_name,
        session_date: input.session_date,
        notes: None,
        template_id: None,
        created_at: now,
        updated_at: now,
    }
}

/// Build a fresh discovery template from validated form input
pub fn new_template(input: TemplateInput) -> DiscoveryTemplate {
    let now = Utc::now();
    DiscoveryTemplate {
        id: new_id("tpl"),
        name: input.name,
        sections: input.sections,
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn session_from_row(row: &Row<'_>) -> rusqlite::Result<DiscoverySession> {
    Ok(DiscoverySession {
        id: row.get(0)?,
        client_name: row.get(1)?,
        opportunity_name: row.get(2)?,
        session_date: date_from_sql(3, row.get(3)?)?,
        notes: row.get(4)?,
        template_id: row.get(5)?,
        created_at: ts_from_sql(6, row.get(6)?)?,
        updated_at: ts_from_sql(7, row.get(7)?)?,
    })
}

pub(crate) fn template_from_row(row: &Row<'_>) -> rusqlite::Result<DiscoveryTemplate> {
    let sections_raw: String = row.get(2)?;
    let sections: Vec<String> = serde_json::from_str(&sections_raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;

    Ok(DiscoveryTemplate {
        id: row.get(0)?,
        name: row.get(1)?,
        sections,
        created_at: ts_from_sql(3, row.get(3)?)?,
        updated_at: ts_from_sql(4, row.get(4)?)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_new_session_has_no_notes_or_template() {
        let session = new_session(SessionInput {
            client_name: "Acme".to_string(),
            opportunity_name: None,
            session_date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
        });
        assert!(session.id.starts_with("dsn_"));
        assert_eq!(session.notes, None);
        assert_eq!(session.template_id, None);
    }

    #[test]
    fn test_new_template_preserves_section_order() {
        let template = new_template(TemplateInput {
            name: "Standard".to_string(),
            sections: vec!["Goals".to_string(), "Pain Points".to_string()],
        });
        assert_eq!(template.sections, vec!["Goals", "Pain Points"]);
    }
}
