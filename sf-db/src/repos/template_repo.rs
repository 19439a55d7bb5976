//! Discovery template repository

use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use sf_core::forms::TemplateInput;
use sf_core::types::DiscoveryTemplate;

use super::SharedConnection;
use crate::entities::{discovery, format_ts, Record};
use crate::error::{DbError, DbResult};

/// CRUD over discovery templates
///
/// Deletion safety (the in-use guard) lives in
/// [`crate::services::TemplateService`]; this repository only answers
/// the raw questions.
#[derive(Clone)]
pub struct TemplateRepo {
    conn: SharedConnection,
}

impl TemplateRepo {
    pub(crate) fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// List templates ordered by name
    pub async fn list(&self) -> DbResult<Vec<DiscoveryTemplate>> {
        let conn = self.conn.lock().await;
        let sql = format!(
            "SELECT {} FROM {} ORDER BY name",
            discovery::TEMPLATE_COLUMNS,
            DiscoveryTemplate::TABLE
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], discovery::template_from_row)?;

        let mut templates = Vec::new();
        for row in rows {
            templates.push(row?);
        }
        Ok(templates)
    }

    /// Get a template by id
    pub async fn get(&self, id: &str) -> DbResult<Option<DiscoveryTemplate>> {
        let conn = self.conn.lock().await;
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1",
            discovery::TEMPLATE_COLUMNS,
            DiscoveryTemplate::TABLE
        );
        Ok(conn
            .query_row(&sql, params![id], discovery::template_from_row)
            .optional()?)
    }

    /// Insert a new template; a name collision surfaces as
    /// [`DbError::Duplicate`].
    pub async fn insert(&self, template: &DiscoveryTemplate) -> DbResult<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO discovery_templates (id, name, sections, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                template.id,
                template.name,
                serde_json::to_string(&template.sections)?,
                format_ts(template.created_at),
                format_ts(template.updated_at),
            ],
        )
        .map_err(|e| DbError::from_write("template", "name", e))?;
        Ok(())
    }

    /// Update name and sections; returns the stored row
    pub async fn update(&self, id: &str, input: &TemplateInput) -> DbResult<DiscoveryTemplate> {
        {
            let conn = self.conn.lock().await;
            let changed = conn
                .execute(
                    "UPDATE discovery_templates SET name = ?2, sections = ?3, updated_at = ?4 \
                     WHERE id = ?1",
                    params![
                        id,
                        input.name,
                        serde_json::to_string(&input.sections)?,
                        format_ts(Utc::now()),
                    ],
                )
                .map_err(|e| DbError::from_write("template", "name", e))?;
            if changed == 0 {
                return Err(DbError::NotFound {
                    entity: "template",
                    id: id.to_string(),
                });
            }
        }
        self.get(id).await?.ok_or_else(|| DbError::NotFound {
            entity: "template",
            id: id.to_string(),
        })
    }

    /// Unguarded delete; true if a row was removed
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        let conn = self.conn.lock().await;
        let changed = conn.execute("DELETE FROM discovery_templates WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    /// How many sessions reference this template
    pub async fn count_referencing_sessions(&self, template_id: &str) -> DbResult<i64> {
        let conn = self.conn.lock().await;
        Ok(conn.query_row(
            "SELECT COUNT(*) FROM discovery_sessions WHERE template_id = ?1",
            params![template_id],
            |row| row.get(0),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::new_template;
    use crate::repos::test_db;

    fn input(name: &str) -> TemplateInput {
        TemplateInput {
            name: name.to_string(),
            sections: vec!["Goals".to_string(), "Pain Points".to_string()],
        }
    }

    #[tokio::test]
    async fn test_sections_roundtrip_in_order() {
        let db = test_db().await;
        let template = new_template(TemplateInput {
            name: "Standard".to_string(),
            sections: vec!["Z Section".to_string(), "A Section".to_string()],
        });
        db.templates.insert(&template).await.unwrap();

        let fetched = db.templates.get(&template.id).await.unwrap().unwrap();
        // Insertion order, not alphabetical
        assert_eq!(fetched.sections, vec!["Z Section", "A Section"]);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_distinct_error() {
        let db = test_db().await;
        db.templates.insert(&new_template(input("Standard"))).await.unwrap();

        let err = db
            .templates
            .insert(&new_template(input("Standard")))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Duplicate {
                entity: "template",
                field: "name"
            }
        ));
        assert_eq!(db.templates.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_to_existing_name_is_duplicate() {
        let db = test_db().await;
        let first = new_template(input("First"));
        let second = new_template(input("Second"));
        db.templates.insert(&first).await.unwrap();
        db.templates.insert(&second).await.unwrap();

        let err = db
            .templates
            .update(&second.id, &input("First"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn test_count_referencing_sessions() {
        let db = test_db().await;
        let template = new_template(input("Standard"));
        db.templates.insert(&template).await.unwrap();
        assert_eq!(
            db.templates
                .count_referencing_sessions(&template.id)
                .await
                .unwrap(),
            0
        );
    }
}
