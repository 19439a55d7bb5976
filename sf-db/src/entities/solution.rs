//! Solution row mapping

use chrono::Utc;
use rusqlite::Row;
use sf_core::forms::SolutionInput;
use sf_core::types::Solution;

use super::{new_id, ts_from_sql, Record};

impl Record for Solution {
    const TABLE: &'static str = "solutions";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Column list shared by every solution SELECT
pub(crate) const COLUMNS: &str =
    "id, name, description, pain_points, is_active, created_at, updated_at";

/// Build a fresh, active solution from validated form input
pub fn new_solution(input: SolutionInput) -> Solution {
    let now = Utc::now();
    Solution {
        id: new_id("sol"),
        name: input.name,
        description: input.description,
        pain_points: input.pain_points,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Solution> {
    Ok(Solution {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        pain_points: row.get(3)?,
        is_active: row.get(4)?,
        created_at: ts_from_sql(5, row.get(5)?)?,
        updated_at: ts_from_sql(6, row.get(6)?)?,
    })
}
