//! User row mapping
//!
//! Users exist to back the login/signup routes; the password hash never
//! leaves this layer except for verification at the auth boundary.

use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::{new_id, ts_from_sql, Record};

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    /// Unique login identifier
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Record for UserRecord {
    const TABLE: &'static str = "users";

    fn id(&self) -> &str {
        &self.id
    }
}

pub(crate) const COLUMNS: &str = "id, email, password_hash, display_name, created_at";

/// Build a fresh user; the caller supplies an already-hashed password
pub fn new_user(email: String, password_hash: String, display_name: Option<String>) -> UserRecord {
    UserRecord {
        id: new_id("usr"),
        email,
        password_hash,
        display_name,
        created_at: Utc::now(),
    }
}

pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<UserRecord> {
    Ok(UserRecord {
        id: row.get(0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        display_name: row.get(3)?,
        created_at: ts_from_sql(4, row.get(4)?)?,
    })
}
