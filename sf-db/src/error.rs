//! Database error types
//!
//! Uniqueness and foreign-key violations are surfaced as their own
//! variants so callers can branch on them (duplicate-name messages,
//! delete-blocked-by-reference), never as generic query failures.

use thiserror::Error;

/// Persistence layer errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Unique constraint violated
    #[error("A {entity} with this {field} already exists")]
    Duplicate {
        entity: &'static str,
        field: &'static str,
    },

    /// Record not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Foreign key constraint violated
    #[error("Referenced record does not exist: {0}")]
    ForeignKey(String),

    /// Template referenced by at least one discovery session
    #[error("Cannot delete a template that is in use by discovery sessions")]
    TemplateInUse { template_id: String, sessions: i64 },

    /// Domain invariant violated before the write
    #[error("Validation error: {0}")]
    Validation(String),

    /// Connection failure
    #[error("Connection error: {0}")]
    Connection(String),

    /// Any other SQLite failure
    #[error("Query error: {0}")]
    Query(String),

    /// Stored value could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Database result type
pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    /// Map a SQLite failure from an insert/update against a table whose
    /// unique index covers `field`.
    ///
    /// SQLite reports constraint classes through extended result codes;
    /// unique violations become [`DbError::Duplicate`], foreign-key
    /// violations [`DbError::ForeignKey`], everything else
    /// [`DbError::Query`].
    pub fn from_write(entity: &'static str, field: &'static str, err: rusqlite::Error) -> Self {
        match constraint_class(&err) {
            Some(ConstraintClass::Unique) => DbError::Duplicate { entity, field },
            Some(ConstraintClass::ForeignKey) => DbError::ForeignKey(err.to_string()),
            None => DbError::Query(err.to_string()),
        }
    }
}

/// Constraint classes we branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConstraintClass {
    Unique,
    ForeignKey,
}

pub(crate) fn constraint_class(err: &rusqlite::Error) -> Option<ConstraintClass> {
    if let rusqlite::Error::SqliteFailure(sqlite_err, _) = err {
        match sqlite_err.extended_code {
            rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                Some(ConstraintClass::Unique)
            }
            rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(ConstraintClass::ForeignKey),
            _ => None,
        }
    } else {
        None
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        match constraint_class(&err) {
            Some(ConstraintClass::ForeignKey) => DbError::ForeignKey(err.to_string()),
            // A unique violation reaching this generic path still must
            // not masquerade as an ordinary query failure.
            Some(ConstraintClass::Unique) => DbError::Duplicate {
                entity: "record",
                field: "key",
            },
            None => DbError::Query(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        DbError::Serialization(err.to_string())
    }
}
