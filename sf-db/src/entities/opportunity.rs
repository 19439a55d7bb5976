//! Opportunity row mapping
//!
//! Type, stage and amount are stored in their display/text forms; the
//! mapper parses them back into the typed domain record and fails the
//! row (not the process) on values the enums no longer recognize.

use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::Row;
use rust_decimal::Decimal;
use sf_core::forms::OpportunityInput;
use sf_core::types::{Opportunity, OpportunityType, Stage};
use std::str::FromStr;

use super::{new_id, ts_from_sql, Record};

impl Record for Opportunity {
    const TABLE: &'static str = "opportunities";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Column list shared by every opportunity SELECT
pub(crate) const COLUMNS: &str = "id, name, client_name, description, opportunity_type, stage, \
     estimated_value, discovery_session_id, created_at, updated_at";

/// Build a fresh opportunity from validated form input
pub fn new_opportunity(input: OpportunityInput) -> Opportunity {
    let now = Utc::now();
    Opportunity {
        id: new_id("opp"),
        name: input.name,
        client_name: input.client_name,
        description: input.description,
        opportunity_type: input.opportunity_type,
        stage: input.stage,
        estimated_value: input.estimated_value,
        discovery_session_id: None,
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Opportunity> {
    let type_raw: String = row.get(4)?;
    let stage_raw: String = row.get(5)?;
    let value_raw: Option<String> = row.get(6)?;

    let opportunity_type = OpportunityType::parse(&type_raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;
    let stage = Stage::parse(&stage_raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;
    let estimated_value = value_raw
        .map(|raw| {
            Decimal::from_str(&raw).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e))
            })
        })
        .transpose()?;

    Ok(Opportunity {
        id: row.get(0)?,
        name: row.get(1)?,
        client_name: row.get(2)?,
        description: row.get(3)?,
        opportunity_type,
        stage,
        estimated_value,
        discovery_session_id: row.get(7)?,
        created_at: ts_from_sql(8, row.get(8)?)?,
        updated_at: ts_from_sql(9, row.get(9)?)?,
    })
}
