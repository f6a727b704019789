//! SQLite user store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use super::database::connection::DbPool;
use super::database::model::UserRow;
use super::database::schema::users;
use crate::domain::id::UserId;
use crate::domain::user::{Role, User};
use crate::error::{AuthError, Error, Result};
use crate::port::UserStore;

/// SQLite-backed [`UserStore`].
pub struct SqliteUserStore {
    pool: DbPool,
}

impl SqliteUserStore {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn to_row(user: &User) -> UserRow {
        UserRow {
            id: user.id.to_string(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role.as_str().to_string(),
            employee_id: user.employee_id.clone(),
            created_at: user.created_at.to_rfc3339(),
        }
    }

    fn from_row(row: UserRow) -> Result<User> {
        let role: Role = row.role.parse().map_err(Error::Parse)?;
        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map_err(|e| Error::Parse(e.to_string()))?
            .with_timezone(&Utc);
        Ok(User {
            id: UserId::new(row.id),
            email: row.email,
            password_hash: row.password_hash,
            role,
            employee_id: row.employee_id,
            created_at,
        })
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn create(&self, user: &User) -> Result<()> {
        let row = Self::to_row(user);
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(|e| match e {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    AuthError::EmailTaken(user.email.clone()).into()
                }
                other => Error::Database(other.to_string()),
            })?;

        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;

        row.map(Self::from_row).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let row: Option<UserRow> = users::table
            .find(id.as_str())
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;

        row.map(Self::from_row).transpose()
    }
}
