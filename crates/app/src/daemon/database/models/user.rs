use common::prelude::{UserId, UserSummary};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::daemon::database::types::{DTime, DUuid};
use crate::daemon::database::Database;

#[derive(Debug, FromRow)]
struct UserRow {
    id: DUuid,
    name: String,
    email: String,
    password_hash: String,
    created_at: DTime,
}

/// A stored user, credentials included. Never serialized to clients; use
/// [`UserRecord::summary`] for that.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

impl UserRecord {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id.into(),
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at.into(),
        }
    }
}

impl Database {
    /// Create a user. Fails if the email is already taken.
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRecord, sqlx::Error> {
        let id = UserId::generate();

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(DUuid::from(id))
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(DTime::now())
        .execute(&**self)
        .await?;

        self.user_by_id(&id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn user_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, sqlx::Error> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(DUuid::from(*id))
        .fetch_optional(&**self)
        .await?;

        Ok(row.map(Into::into))
    }

    pub async fn user_by_email(&self, email: &str) -> Result<Option<UserRecord>, sqlx::Error> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&**self)
        .await?;

        Ok(row.map(Into::into))
    }
}
