//! ServiceFlow Database Layer
//!
//! SQLite-backed persistence for the ServiceFlow entities. The layout
//! follows a fixed split:
//!
//! - [`entities`] - row mapping and constructors for the domain records
//! - [`repos`] - one repository per table, plus the [`Database`] entry
//!   point owning the connection
//! - [`services`] - multi-step flows that repositories alone cannot
//!   express safely (stage/type enforcement, guarded template deletion,
//!   idempotent linking, section-notes persistence)
//! - [`schema`] - the DDL, applied by [`Database::init_schema`]
//! - [`validation`] - domain invariants checked before every write
//!
//! The store is trusted to enforce uniqueness and foreign keys; every
//! other invariant is checked here before a statement is issued.
//!
//! # Usage
//!
//! ```ignore
//! use sf_db::Database;
//!
//! let db = Database::open_in_memory()?;
//! db.init_schema().await?;
//! let solutions = db.solutions.list(false, None).await?;
//! ```

pub mod entities;
pub mod error;
pub mod repos;
pub mod schema;
pub mod services;
pub mod validation;

// Re-export main types
pub use entities::UserRecord;
pub use error::{DbError, DbResult};
pub use repos::{
    Database, LinkOutcome, LinkRepo, OpportunityRepo, SessionRepo, SolutionRepo, StageCount,
    TemplateRepo, TypeCount, UnlinkOutcome, UserRepo,
};
pub use schema::SCHEMA;
pub use services::{DiscoveryService, OpportunityService, TemplateService};
