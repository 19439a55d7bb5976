//! Discovery session repository

use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use sf_core::forms::SessionInput;
use sf_core::types::DiscoverySession;

use super::SharedConnection;
use crate::entities::{discovery, format_ts, Record};
use crate::error::{DbError, DbResult};

/// CRUD over discovery sessions
#[derive(Clone)]
pub struct SessionRepo {
    conn: SharedConnection,
}

impl SessionRepo {
    pub(crate) fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// List sessions, most recent session date first
    pub async fn list(&self) -> DbResult<Vec<DiscoverySession>> {
        let conn = self.conn.lock().await;
        let sql = format!(
            "SELECT {} FROM {} ORDER BY session_date DESC, created_at DESC",
            discovery::SESSION_COLUMNS,
            DiscoverySession::TABLE
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], discovery::session_from_row)?;

        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(row?);
        }
        Ok(sessions)
    }

    /// Get a session by id
    pub async fn get(&self, id: &str) -> DbResult<Option<DiscoverySession>> {
        let conn = self.conn.lock().await;
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1",
            discovery::SESSION_COLUMNS,
            DiscoverySession::TABLE
        );
        Ok(conn
            .query_row(&sql, params![id], discovery::session_from_row)
            .optional()?)
    }

    /// Insert a new session
    pub async fn insert(&self, session: &DiscoverySession) -> DbResult<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO discovery_sessions \
             (id, client_name, opportunity_name, session_date, notes, template_id, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                session.id,
                session.client_name,
                session.opportunity_name,
                session.session_date.format("%Y-%m-%d").to_string(),
                session.notes,
                session.template_id,
                format_ts(session.created_at),
                format_ts(session.updated_at),
            ],
        )?;
        Ok(())
    }

    /// Update the headline fields; returns the stored row
    pub async fn update(&self, id: &str, input: &SessionInput) -> DbResult<DiscoverySession> {
        {
            let conn = self.conn.lock().await;
            let changed = conn.execute(
                "UPDATE discovery_sessions SET client_name = ?2, opportunity_name = ?3, \
                 session_date = ?4, updated_at = ?5 WHERE id = ?1",
                params![
                    id,
                    input.client_name,
                    input.opportunity_name,
                    input.session_date.format("%Y-%m-%d").to_string(),
                    format_ts(Utc::now()),
                ],
            )?;
            if changed == 0 {
                return Err(DbError::NotFound {
                    entity: "discovery session",
                    id: id.to_string(),
                });
            }
        }
        self.require(id).await
    }

    /// Replace the notes blob; `None` clears it
    pub async fn save_notes(&self, id: &str, notes: Option<&str>) -> DbResult<DiscoverySession> {
        {
            let conn = self.conn.lock().await;
            let changed = conn.execute(
                "UPDATE discovery_sessions SET notes = ?2, updated_at = ?3 WHERE id = ?1",
                params![id, notes, format_ts(Utc::now())],
            )?;
            if changed == 0 {
                return Err(DbError::NotFound {
                    entity: "discovery session",
                    id: id.to_string(),
                });
            }
        }
        self.require(id).await
    }

    /// Attach a template (or detach with `None`)
    pub async fn set_template(
        &self,
        id: &str,
        template_id: Option<&str>,
    ) -> DbResult<DiscoverySession> {
        {
            let conn = self.conn.lock().await;
            let changed = conn.execute(
                "UPDATE discovery_sessions SET template_id = ?2, updated_at = ?3 WHERE id = ?1",
                params![id, template_id, format_ts(Utc::now())],
            )?;
            if changed == 0 {
                return Err(DbError::NotFound {
                    entity: "discovery session",
                    id: id.to_string(),
                });
            }
        }
        self.require(id).await
    }

    /// Hard delete; true if a row was removed
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        let conn = self.conn.lock().await;
        let changed = conn.execute("DELETE FROM discovery_sessions WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    /// Total session count, for the dashboard
    pub async fn count(&self) -> DbResult<i64> {
        let conn = self.conn.lock().await;
        Ok(conn.query_row("SELECT COUNT(*) FROM discovery_sessions", [], |row| row.get(0))?)
    }

    async fn require(&self, id: &str) -> DbResult<DiscoverySession> {
        self.get(id).await?.ok_or_else(|| DbError::NotFound {
            entity: "discovery session",
            id: id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::new_session;
    use crate::repos::test_db;
    use chrono::NaiveDate;

    fn input(client: &str, day: u32) -> SessionInput {
        SessionInput {
            client_name: client.to_string(),
            opportunity_name: None,
            session_date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_list_order() {
        let db = test_db().await;
        db.sessions.insert(&new_session(input("Early", 1))).await.unwrap();
        db.sessions.insert(&new_session(input("Late", 20))).await.unwrap();

        let listed = db.sessions.list().await.unwrap();
        assert_eq!(listed[0].client_name, "Late");
        assert_eq!(listed[1].client_name, "Early");
    }

    #[tokio::test]
    async fn test_save_and_clear_notes() {
        let db = test_db().await;
        let session = new_session(input("Acme", 14));
        db.sessions.insert(&session).await.unwrap();

        let updated = db
            .sessions
            .save_notes(&session.id, Some("## Goals\nGrow"))
            .await
            .unwrap();
        assert_eq!(updated.notes.as_deref(), Some("## Goals\nGrow"));

        let cleared = db.sessions.save_notes(&session.id, None).await.unwrap();
        assert_eq!(cleared.notes, None);
    }

    #[tokio::test]
    async fn test_set_template_requires_existing_template() {
        let db = test_db().await;
        let session = new_session(input("Acme", 14));
        db.sessions.insert(&session).await.unwrap();

        let err = db
            .sessions
            .set_template(&session.id, Some("tpl_missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKey(_)));
    }

    #[tokio::test]
    async fn test_update_headline_fields() {
        let db = test_db().await;
        let session = new_session(input("Acme", 14));
        db.sessions.insert(&session).await.unwrap();

        let updated = db
            .sessions
            .update(
                &session.id,
                &SessionInput {
                    client_name: "Acme Corp".to_string(),
                    opportunity_name: Some("Redesign".to_string()),
                    session_date: NaiveDate::from_ymd_opt(2025, 4, 2).unwrap(),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.client_name, "Acme Corp");
        assert_eq!(updated.opportunity_name.as_deref(), Some("Redesign"));
    }
}
