//! Opportunity repository
//!
//! Listing fetches the base collection and applies the pure projection
//! from `sf_core::views`; summary tallies come from separate unfiltered
//! aggregates so the widgets never follow the table's filters.

use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use sf_core::types::Opportunity;
use sf_core::views::{OpportunityFilter, SortSpec};

use super::SharedConnection;
use crate::entities::{format_ts, opportunity, Record};
use crate::error::{DbError, DbResult};

/// Opportunity count for one stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCount {
    pub stage: String,
    pub count: i64,
}

/// Opportunity count for one type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCount {
    pub opportunity_type: String,
    pub count: i64,
}

/// CRUD and aggregates over the opportunity pipeline
#[derive(Clone)]
pub struct OpportunityRepo {
    conn: SharedConnection,
}

impl OpportunityRepo {
    pub(crate) fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// List opportunities under the given filter and sort selectors
    pub async fn list(
        &self,
        filter: &OpportunityFilter,
        sort: SortSpec,
    ) -> DbResult<Vec<Opportunity>> {
        let items = self.list_all().await?;
        Ok(sf_core::views::project(items, filter, sort))
    }

    /// Fetch the whole base collection
    pub async fn list_all(&self) -> DbResult<Vec<Opportunity>> {
        let conn = self.conn.lock().await;
        let sql = format!(
            "SELECT {} FROM {}",
            opportunity::COLUMNS,
            Opportunity::TABLE
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], opportunity::from_row)?;

        let mut opportunities = Vec::new();
        for row in rows {
            opportunities.push(row?);
        }
        Ok(opportunities)
    }

    /// Get an opportunity by id
    pub async fn get(&self, id: &str) -> DbResult<Option<Opportunity>> {
        let conn = self.conn.lock().await;
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1",
            opportunity::COLUMNS,
            Opportunity::TABLE
        );
        Ok(conn
            .query_row(&sql, params![id], opportunity::from_row)
            .optional()?)
    }

    /// Insert a new opportunity
    pub async fn insert(&self, opportunity: &Opportunity) -> DbResult<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO opportunities \
             (id, name, client_name, description, opportunity_type, stage, estimated_value, \
              discovery_session_id, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                opportunity.id,
                opportunity.name,
                opportunity.client_name,
                opportunity.description,
                opportunity.opportunity_type.as_str(),
                opportunity.stage.as_str(),
                opportunity.estimated_value.map(|v| v.to_string()),
                opportunity.discovery_session_id,
                format_ts(opportunity.created_at),
                format_ts(opportunity.updated_at),
            ],
        )?;
        Ok(())
    }

    /// Write every mutable field of an existing opportunity
    pub async fn update(&self, opportunity: &Opportunity) -> DbResult<()> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "UPDATE opportunities SET name = ?2, client_name = ?3, description = ?4, \
             opportunity_type = ?5, stage = ?6, estimated_value = ?7, updated_at = ?8 \
             WHERE id = ?1",
            params![
                opportunity.id,
                opportunity.name,
                opportunity.client_name,
                opportunity.description,
                opportunity.opportunity_type.as_str(),
                opportunity.stage.as_str(),
                opportunity.estimated_value.map(|v| v.to_string()),
                format_ts(opportunity.updated_at),
            ],
        )?;
        if changed == 0 {
            return Err(DbError::NotFound {
                entity: "opportunity",
                id: opportunity.id.clone(),
            });
        }
        Ok(())
    }

    /// Point the opportunity at a discovery session (or clear the link)
    pub async fn set_discovery_session(
        &self,
        id: &str,
        session_id: Option<&str>,
    ) -> DbResult<()> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "UPDATE opportunities SET discovery_session_id = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, session_id, format_ts(Utc::now())],
        )?;
        if changed == 0 {
            return Err(DbError::NotFound {
                entity: "opportunity",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Hard delete; true if a row was removed
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        let conn = self.conn.lock().await;
        let changed = conn.execute("DELETE FROM opportunities WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    /// Per-stage counts over the entire unfiltered collection
    pub async fn stage_summary(&self) -> DbResult<Vec<StageCount>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT stage, COUNT(*) FROM opportunities GROUP BY stage ORDER BY stage",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(StageCount {
                stage: row.get(0)?,
                count: row.get(1)?,
            })
        })?;

        let mut counts = Vec::new();
        for row in rows {
            counts.push(row?);
        }
        Ok(counts)
    }

    /// Per-type counts over the entire unfiltered collection
    pub async fn type_summary(&self) -> DbResult<Vec<TypeCount>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT opportunity_type, COUNT(*) FROM opportunities \
             GROUP BY opportunity_type ORDER BY opportunity_type",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(TypeCount {
                opportunity_type: row.get(0)?,
                count: row.get(1)?,
            })
        })?;

        let mut counts = Vec::new();
        for row in rows {
            counts.push(row?);
        }
        Ok(counts)
    }

    /// Count of opportunities not yet closed, for the dashboard
    pub async fn count_open(&self) -> DbResult<i64> {
        let conn = self.conn.lock().await;
        Ok(conn.query_row(
            "SELECT COUNT(*) FROM opportunities WHERE stage NOT IN ('Closed Won', 'Closed Lost')",
            [],
            |row| row.get(0),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::new_opportunity;
    use crate::repos::test_db;
    use sf_core::forms::OpportunityInput;
    use sf_core::types::{OpportunityType, Stage};
    use sf_core::views::{SortDir, SortField};

    fn input(name: &str, ty: OpportunityType, stage: Stage) -> OpportunityInput {
        OpportunityInput {
            name: name.to_string(),
            client_name: "Acme".to_string(),
            description: None,
            opportunity_type: ty,
            stage,
            estimated_value: None,
        }
    }

    #[tokio::test]
    async fn test_insert_get_roundtrip() {
        let db = test_db().await;
        let opp = new_opportunity(input(
            "Website Redesign",
            OpportunityType::Concept,
            Stage::Discovery,
        ));
        db.opportunities.insert(&opp).await.unwrap();

        let fetched = db.opportunities.get(&opp.id).await.unwrap().unwrap();
        assert_eq!(fetched, opp);
    }

    #[tokio::test]
    async fn test_list_applies_filter_and_sort() {
        let db = test_db().await;
        for (name, ty, stage) in [
            ("B Deal", OpportunityType::Concept, Stage::Discovery),
            ("A Deal", OpportunityType::Concept, Stage::Proposal),
            ("C Deal", OpportunityType::PaidAudit, Stage::AuditProposed),
        ] {
            db.opportunities
                .insert(&new_opportunity(input(name, ty, stage)))
                .await
                .unwrap();
        }

        let filter = OpportunityFilter {
            stage: None,
            opportunity_type: Some(OpportunityType::Concept),
        };
        let sort = SortSpec {
            field: SortField::Name,
            dir: SortDir::Asc,
        };
        let listed = db.opportunities.list(&filter, sort).await.unwrap();
        let names: Vec<_> = listed.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["A Deal", "B Deal"]);
    }

    #[tokio::test]
    async fn test_summaries_ignore_filters_by_construction() {
        let db = test_db().await;
        for (name, ty, stage) in [
            ("One1", OpportunityType::Concept, Stage::Discovery),
            ("Two2", OpportunityType::Concept, Stage::Discovery),
            ("Three3", OpportunityType::PaidAudit, Stage::AuditPaid),
        ] {
            db.opportunities
                .insert(&new_opportunity(input(name, ty, stage)))
                .await
                .unwrap();
        }

        let stages = db.opportunities.stage_summary().await.unwrap();
        assert_eq!(
            stages,
            vec![
                StageCount {
                    stage: "Audit Paid".to_string(),
                    count: 1
                },
                StageCount {
                    stage: "Discovery".to_string(),
                    count: 2
                },
            ]
        );

        let types = db.opportunities.type_summary().await.unwrap();
        assert_eq!(types.len(), 2);
        assert_eq!(types[0].opportunity_type, "Concept");
        assert_eq!(types[0].count, 2);
    }

    #[tokio::test]
    async fn test_count_open_excludes_closed() {
        let db = test_db().await;
        for (name, stage) in [
            ("Open1", Stage::Discovery),
            ("Won1", Stage::ClosedWon),
            ("Lost1", Stage::ClosedLost),
        ] {
            db.opportunities
                .insert(&new_opportunity(input(name, OpportunityType::Concept, stage)))
                .await
                .unwrap();
        }
        assert_eq!(db.opportunities.count_open().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let db = test_db().await;
        let opp = new_opportunity(input("Ghost", OpportunityType::Concept, Stage::Discovery));
        let err = db.opportunities.update(&opp).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_set_discovery_session_enforces_fk() {
        let db = test_db().await;
        let opp = new_opportunity(input("Linked", OpportunityType::Concept, Stage::Discovery));
        db.opportunities.insert(&opp).await.unwrap();

        let err = db
            .opportunities
            .set_discovery_session(&opp.id, Some("dsn_missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKey(_)));
    }
}
