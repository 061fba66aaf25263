use common::prelude::{Message, UserId};
use sqlx::FromRow;

use crate::daemon::database::types::{DTime, DUuid};
use crate::daemon::database::Database;

#[derive(Debug, FromRow)]
struct MessageRow {
    id: DUuid,
    sender_id: DUuid,
    receiver_id: DUuid,
    message: String,
    read: bool,
    read_at: Option<DTime>,
    created_at: DTime,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Self {
            id: row.id.into(),
            sender_id: row.sender_id.into(),
            receiver_id: row.receiver_id.into(),
            message: row.message,
            read: row.read,
            read_at: row.read_at.map(Into::into),
            created_at: row.created_at.into(),
        }
    }
}

impl Database {
    pub async fn send_message(
        &self,
        sender: &UserId,
        receiver: &UserId,
        text: &str,
    ) -> Result<Message, sqlx::Error> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages (id, sender_id, receiver_id, message, read, created_at)
            VALUES (?1, ?2, ?3, ?4, 0, ?5)
            RETURNING id, sender_id, receiver_id, message, read, read_at, created_at
            "#,
        )
        .bind(DUuid::new())
        .bind(DUuid::from(*sender))
        .bind(DUuid::from(*receiver))
        .bind(text)
        .bind(DTime::now())
        .fetch_one(&**self)
        .await?;

        Ok(row.into())
    }

    /// Every message `user` sent or received, oldest first.
    pub async fn messages_for(&self, user: &UserId) -> Result<Vec<Message>, sqlx::Error> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, sender_id, receiver_id, message, read, read_at, created_at
            FROM messages
            WHERE sender_id = ?1 OR receiver_id = ?1
            ORDER BY created_at ASC, rowid ASC
            "#,
        )
        .bind(DUuid::from(*user))
        .fetch_all(&**self)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Flag every unread message addressed to `receiver` as read. Returns how
    /// many changed.
    pub async fn mark_read(&self, receiver: &UserId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET read = 1, read_at = ?1
            WHERE receiver_id = ?2 AND read = 0
            "#,
        )
        .bind(DTime::now())
        .bind(DUuid::from(*receiver))
        .execute(&**self)
        .await?;

        Ok(result.rows_affected())
    }
}
