//! Entity row mapping and constructors
//!
//! Each submodule binds one domain record to its table: the `Record`
//! impl naming the table, a `from_row` mapper, and a constructor that
//! stamps a fresh id and timestamps onto validated form input.

pub(crate) mod discovery;
pub(crate) mod opportunity;
pub(crate) mod solution;
pub(crate) mod user;

pub use discovery::{new_session, new_template};
pub use opportunity::new_opportunity;
pub use solution::new_solution;
pub use user::{new_user, UserRecord};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use uuid::Uuid;

/// A record bound to a table
pub trait Record {
    /// Table name
    const TABLE: &'static str;

    /// Primary key
    fn id(&self) -> &str;
}

/// Generate a prefixed opaque id, e.g. `sol_0f9a...`
pub(crate) fn new_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}

/// RFC 3339 storage form for timestamps
pub(crate) fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

pub(crate) fn ts_from_sql(idx: usize, raw: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn date_from_sql(idx: usize, raw: String) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_is_prefixed_and_unique() {
        let a = new_id("sol");
        let b = new_id("sol");
        assert!(a.starts_with("sol_"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_ts_roundtrip() {
        let now = Utc::now();
        let parsed = ts_from_sql(0, format_ts(now)).unwrap();
        assert_eq!(parsed, now);
    }

    #[test]
    fn test_date_from_sql_rejects_garbage() {
        assert!(date_from_sql(0, "not-a-date".to_string()).is_err());
    }
}
