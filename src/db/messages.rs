//! Message repository.
//!
//! Chat messages are append-only: rows are inserted once and never updated.

use super::DbError;
use crate::store::StoredMessage;
use sqlx::SqlitePool;

/// Repository for chat message rows.
pub struct MessageRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MessageRepository<'a> {
    /// Create a new message repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert one message.
    pub async fn insert(&self, message: &StoredMessage) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, group_id, author_id, body, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&message.id)
        .bind(message.room_id.as_str())
        .bind(&message.author_id)
        .bind(&message.body)
        .bind(message.created_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Most recent messages of a group, oldest first.
    #[cfg(test)]
    pub async fn recent(&self, group_id: &str, limit: i64) -> Result<Vec<StoredMessage>, DbError> {
        let rows = sqlx::query_as::<_, (String, String, String, String, i64)>(
            r#"
            SELECT id, group_id, author_id, body, created_at
            FROM (
                SELECT id, group_id, author_id, body, created_at, rowid AS seq
                FROM messages
                WHERE group_id = ?
                ORDER BY seq DESC
                LIMIT ?
            )
            ORDER BY seq ASC
            "#,
        )
        .bind(group_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, group_id, author_id, body, created_at)| StoredMessage {
                id,
                room_id: group_id.into(),
                author_id,
                body,
                created_at,
            })
            .collect())
    }
}
