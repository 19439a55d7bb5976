//! Session <-> solution link repository
//!
//! The link table is keyed by the `(discovery_session_id, solution_id)`
//! pair. Both mutations are idempotent: re-linking an existing pair is
//! an informational outcome, unlinking an absent pair is a silent no-op.

use chrono::Utc;
use rusqlite::params;
use sf_core::types::Solution;

use super::SharedConnection;
use crate::entities::{format_ts, solution};
use crate::error::DbResult;

/// Outcome of a link request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// A new association row was created
    Linked,
    /// The pair already existed; nothing changed
    AlreadyLinked,
}

/// Outcome of an unlink request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlinkOutcome {
    /// The association row was removed
    Unlinked,
    /// No such pair existed; nothing changed
    NotLinked,
}

/// Many-to-many association between sessions and solutions
#[derive(Clone)]
pub struct LinkRepo {
    conn: SharedConnection,
}

impl LinkRepo {
    pub(crate) fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Associate a solution with a session.
    ///
    /// `INSERT OR IGNORE` leaves an existing pair untouched, which is
    /// reported as [`LinkOutcome::AlreadyLinked`]. Foreign keys still
    /// apply: unknown ids error out.
    pub async fn link(&self, session_id: &str, solution_id: &str) -> DbResult<LinkOutcome> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "INSERT OR IGNORE INTO session_solutions \
             (discovery_session_id, solution_id, created_at) VALUES (?1, ?2, ?3)",
            params![session_id, solution_id, format_ts(Utc::now())],
        )?;
        Ok(if changed > 0 {
            LinkOutcome::Linked
        } else {
            LinkOutcome::AlreadyLinked
        })
    }

    /// Remove an association; absent pairs are a no-op
    pub async fn unlink(&self, session_id: &str, solution_id: &str) -> DbResult<UnlinkOutcome> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "DELETE FROM session_solutions WHERE discovery_session_id = ?1 AND solution_id = ?2",
            params![session_id, solution_id],
        )?;
        Ok(if changed > 0 {
            UnlinkOutcome::Unlinked
        } else {
            UnlinkOutcome::NotLinked
        })
    }

    /// Solutions linked to a session, ordered by name
    pub async fn solutions_for_session(&self, session_id: &str) -> DbResult<Vec<Solution>> {
        let conn = self.conn.lock().await;
        let sql = format!(
            "SELECT {} FROM solutions s \
             JOIN session_solutions ss ON ss.solution_id = s.id \
             WHERE ss.discovery_session_id = ?1 ORDER BY s.name",
            qualified_columns()
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![session_id], solution::from_row)?;

        let mut solutions = Vec::new();
        for row in rows {
            solutions.push(row?);
        }
        Ok(solutions)
    }

    /// Number of association rows for a pair (0 or 1)
    pub async fn count_pair(&self, session_id: &str, solution_id: &str) -> DbResult<i64> {
        let conn = self.conn.lock().await;
        Ok(conn.query_row(
            "SELECT COUNT(*) FROM session_solutions \
             WHERE discovery_session_id = ?1 AND solution_id = ?2",
            params![session_id, solution_id],
            |row| row.get(0),
        )?)
    }
}

fn qualified_columns() -> String {
    solution::COLUMNS
        .split(", ")
        .map(|c| format!("s.{c}"))
        .collect::<Vec<_>>()
        .join(", ")
}
