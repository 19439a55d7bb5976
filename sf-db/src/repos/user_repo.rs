//! User repository

use rusqlite::{params, OptionalExtension};

use super::SharedConnection;
use crate::entities::{format_ts, user, Record, UserRecord};
use crate::error::{DbError, DbResult};

/// Storage for registered users
#[derive(Clone)]
pub struct UserRepo {
    conn: SharedConnection,
}

impl UserRepo {
    pub(crate) fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Insert a new user; an email collision surfaces as
    /// [`DbError::Duplicate`].
    pub async fn insert(&self, record: &UserRecord) -> DbResult<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO users (id, email, password_hash, display_name, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.id,
                record.email,
                record.password_hash,
                record.display_name,
                format_ts(record.created_at),
            ],
        )
        .map_err(|e| DbError::from_write("user", "email", e))?;
        Ok(())
    }

    /// Look a user up by login email
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRecord>> {
        let conn = self.conn.lock().await;
        let sql = format!(
            "SELECT {} FROM {} WHERE email = ?1",
            user::COLUMNS,
            UserRecord::TABLE
        );
        Ok(conn
            .query_row(&sql, params![email], user::from_row)
            .optional()?)
    }

    /// Get a user by id
    pub async fn get(&self, id: &str) -> DbResult<Option<UserRecord>> {
        let conn = self.conn.lock().await;
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1",
            user::COLUMNS,
            UserRecord::TABLE
        );
        Ok(conn
            .query_row(&sql, params![id], user::from_row)
            .optional()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::new_user;
    use crate::repos::test_db;

    #[tokio::test]
    async fn test_insert_and_find_by_email() {
        let db = test_db().await;
        let record = new_user("pat@example.com".to_string(), "hash".to_string(), None);
        db.users.insert(&record).await.unwrap();

        let found = db.users.find_by_email("pat@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, record.id);
        assert!(db.users.find_by_email("other@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = test_db().await;
        db.users
            .insert(&new_user("pat@example.com".to_string(), "h1".to_string(), None))
            .await
            .unwrap();
        let err = db
            .users
            .insert(&new_user("pat@example.com".to_string(), "h2".to_string(), None))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Duplicate {
                entity: "user",
                field: "email"
            }
        ));
    }
}
