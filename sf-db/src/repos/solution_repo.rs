//! Solution repository

use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use sf_core::forms::SolutionInput;
use sf_core::types::Solution;

use super::SharedConnection;
use crate::entities::{format_ts, solution, Record};
use crate::error::{DbError, DbResult};

/// CRUD over the solutions catalog
#[derive(Clone)]
pub struct SolutionRepo {
    conn: SharedConnection,
}

impl SolutionRepo {
    pub(crate) fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// List solutions ordered by name.
    ///
    /// Archived rows are excluded unless `include_archived`; `search`
    /// applies the picker's case-insensitive substring match.
    pub async fn list(
        &self,
        include_archived: bool,
        search: Option<&str>,
    ) -> DbResult<Vec<Solution>> {
        let conn = self.conn.lock().await;
        let sql = if include_archived {
            format!(
                "SELECT {} FROM {} ORDER BY name",
                solution::COLUMNS,
                Solution::TABLE
            )
        } else {
            format!(
                "SELECT {} FROM {} WHERE is_active = 1 ORDER BY name",
                solution::COLUMNS,
                Solution::TABLE
            )
        };
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], solution::from_row)?;

        let mut solutions = Vec::new();
        for row in rows {
            solutions.push(row?);
        }
        if let Some(term) = search {
            solutions.retain(|s| s.matches_search(term));
        }
        Ok(solutions)
    }

    /// Get a solution by id
    pub async fn get(&self, id: &str) -> DbResult<Option<Solution>> {
        let conn = self.conn.lock().await;
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1",
            solution::COLUMNS,
            Solution::TABLE
        );
        Ok(conn
            .query_row(&sql, params![id], solution::from_row)
            .optional()?)
    }

    /// Insert a new solution; a name collision surfaces as
    /// [`DbError::Duplicate`].
    pub async fn insert(&self, solution: &Solution) -> DbResult<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO solutions (id, name, description, pain_points, is_active, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                solution.id,
                solution.name,
                solution.description,
                solution.pain_points,
                solution.is_active,
                format_ts(solution.created_at),
                format_ts(solution.updated_at),
            ],
        )
        .map_err(|e| DbError::from_write("solution", "name", e))?;
        Ok(())
    }

    /// Update name/description/pain points; returns the stored row
    pub async fn update(&self, id: &str, input: &SolutionInput) -> DbResult<Solution> {
        {
            let conn = self.conn.lock().await;
            let changed = conn
                .execute(
                    "UPDATE solutions SET name = ?2, description = ?3, pain_points = ?4, updated_at = ?5 \
                     WHERE id = ?1",
                    params![
                        id,
                        input.name,
                        input.description,
                        input.pain_points,
                        format_ts(Utc::now()),
                    ],
                )
                .map_err(|e| DbError::from_write("solution", "name", e))?;
            if changed == 0 {
                return Err(DbError::NotFound {
                    entity: "solution",
                    id: id.to_string(),
                });
            }
        }
        self.get(id).await?.ok_or_else(|| DbError::NotFound {
            entity: "solution",
            id: id.to_string(),
        })
    }

    /// Archive or activate; returns the stored row
    pub async fn set_active(&self, id: &str, is_active: bool) -> DbResult<Solution> {
        {
            let conn = self.conn.lock().await;
            let changed = conn.execute(
                "UPDATE solutions SET is_active = ?2, updated_at = ?3 WHERE id = ?1",
                params![id, is_active, format_ts(Utc::now())],
            )?;
            if changed == 0 {
                return Err(DbError::NotFound {
                    entity: "solution",
                    id: id.to_string(),
                });
            }
        }
        self.get(id).await?.ok_or_else(|| DbError::NotFound {
            entity: "solution",
            id: id.to_string(),
        })
    }

    /// Hard delete; true if a row was removed
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        let conn = self.conn.lock().await;
        let changed = conn.execute("DELETE FROM solutions WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    /// Count of active solutions, for the dashboard
    pub async fn count_active(&self) -> DbResult<i64> {
        let conn = self.conn.lock().await;
        Ok(conn.query_row(
            "SELECT COUNT(*) FROM solutions WHERE is_active = 1",
            [],
            |row| row.get(0),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::new_solution;
    use crate::repos::test_db;

    fn input(name: &str) -> SolutionInput {
        SolutionInput {
            name: name.to_string(),
            description: Some("desc".to_string()),
            pain_points: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let solution = new_solution(input("Cloud Audit"));
        db.solutions.insert(&solution).await.unwrap();

        let fetched = db.solutions.get(&solution.id).await.unwrap().unwrap();
        assert_eq!(fetched, solution);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_distinct_error() {
        let db = test_db().await;
        db.solutions
            .insert(&new_solution(input("Cloud Audit")))
            .await
            .unwrap();

        let err = db
            .solutions
            .insert(&new_solution(input("Cloud Audit")))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Duplicate {
                entity: "solution",
                field: "name"
            }
        ));

        // No second record was created
        let all = db.solutions.list(true, None).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_list_excludes_archived_by_default() {
        let db = test_db().await;
        let keep = new_solution(input("Keep"));
        let archive = new_solution(input("Archive"));
        db.solutions.insert(&keep).await.unwrap();
        db.solutions.insert(&archive).await.unwrap();
        db.solutions.set_active(&archive.id, false).await.unwrap();

        let active = db.solutions.list(false, None).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Keep");

        let all = db.solutions.list(true, None).await.unwrap();
        assert_eq!(all.len(), 2);
        // Ordered by name
        assert_eq!(all[0].name, "Archive");
    }

    #[tokio::test]
    async fn test_list_search_is_case_insensitive() {
        let db = test_db().await;
        db.solutions
            .insert(&new_solution(input("Cloud Migration")))
            .await
            .unwrap();
        db.solutions
            .insert(&new_solution(input("Security Audit")))
            .await
            .unwrap();

        let found = db.solutions.list(false, Some("CLOUD")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Cloud Migration");
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let db = test_db().await;
        let err = db.solutions.update("sol_missing", &input("X Y")).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;
        let solution = new_solution(input("Gone"));
        db.solutions.insert(&solution).await.unwrap();
        assert!(db.solutions.delete(&solution.id).await.unwrap());
        assert!(!db.solutions.delete(&solution.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_count_active() {
        let db = test_db().await;
        let a = new_solution(input("A1"));
        let b = new_solution(input("B1"));
        db.solutions.insert(&a).await.unwrap();
        db.solutions.insert(&b).await.unwrap();
        db.solutions.set_active(&b.id, false).await.unwrap();
        assert_eq!(db.solutions.count_active().await.unwrap(), 1);
    }
}
