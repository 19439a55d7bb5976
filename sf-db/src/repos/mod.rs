//! Repository implementations
//!
//! One repository per table. [`Database`] owns the SQLite connection
//! behind an async mutex and hands each repository a shared handle;
//! statements are short-lived, so the lock is never held across other
//! awaits.

mod link_repo;
mod opportunity_repo;
mod session_repo;
mod solution_repo;
mod template_repo;
mod user_repo;

pub use link_repo::{LinkOutcome, LinkRepo, UnlinkOutcome};
pub use opportunity_repo::{OpportunityRepo, StageCount, TypeCount};
pub use session_repo::SessionRepo;
pub use solution_repo::SolutionRepo;
pub use template_repo::TemplateRepo;
pub use user_repo::UserRepo;

use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::{DbError, DbResult};

pub(crate) type SharedConnection = Arc<Mutex<Connection>>;

/// ServiceFlow database - main entry point for storage operations
#[derive(Clone)]
pub struct Database {
    conn: SharedConnection,
    pub solutions: SolutionRepo,
    pub opportunities: OpportunityRepo,
    pub sessions: SessionRepo,
    pub templates: TemplateRepo,
    pub links: LinkRepo,
    pub users: UserRepo,
}

impl Database {
    /// Open (or create) a database file
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let conn =
            Connection::open(path).map_err(|e| DbError::Connection(e.to_string()))?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database, used by tests
    pub fn open_in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::Connection(e.to_string()))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> DbResult<Self> {
        // Referential integrity is opt-in per connection
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| DbError::Connection(e.to_string()))?;

        let conn: SharedConnection = Arc::new(Mutex::new(conn));
        Ok(Self {
            solutions: SolutionRepo::new(conn.clone()),
            opportunities: OpportunityRepo::new(conn.clone()),
            sessions: SessionRepo::new(conn.clone()),
            templates: TemplateRepo::new(conn.clone()),
            links: LinkRepo::new(conn.clone()),
            users: UserRepo::new(conn.clone()),
            conn,
        })
    }

    /// Apply the schema; safe to call repeatedly
    pub async fn init_schema(&self) -> DbResult<()> {
        let conn = self.conn.lock().await;
        conn.execute_batch(crate::schema::SCHEMA)?;
        tracing::info!("database schema initialized");
        Ok(())
    }

    /// Check database health
    pub async fn health_check(&self) -> DbResult<bool> {
        let conn = self.conn.lock().await;
        let one: i64 = conn.query_row("SELECT 1", [], |row| row.get(0))?;
        Ok(one == 1)
    }
}

#[cfg(test)]
pub(crate) async fn test_db() -> Database {
    let db = Database::open_in_memory().expect("in-memory database");
    db.init_schema().await.expect("schema init");
    db
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_and_health_check() {
        let db = test_db().await;
        assert!(db.health_check().await.unwrap());
    }
}
