//! Group repository.
//!
//! Read-only lookups over the group, membership and user tables maintained by
//! the surrounding application.

use super::DbError;
use sqlx::SqlitePool;

/// A group as seen by the chat gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRecord {
    pub id: String,
    pub slug: String,
    pub owner_id: String,
}

/// Profile fields used for display names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Repository for group lookups.
pub struct GroupRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> GroupRepository<'a> {
    /// Create a new group repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a group by its slug.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<GroupRecord>, DbError> {
        let row = sqlx::query_as::<_, (String, String, String)>(
            r#"
            SELECT id, slug, owner_id
            FROM groups
            WHERE slug = ?
            LIMIT 1
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(id, slug, owner_id)| GroupRecord { id, slug, owner_id }))
    }

    /// Whether `user_id` is listed as a participant of `group_id`.
    pub async fn is_member(&self, group_id: &str, user_id: &str) -> Result<bool, DbError> {
        let row = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT 1
            FROM group_members
            WHERE group_id = ? AND user_id = ?
            LIMIT 1
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.is_some())
    }

    /// Find a user's profile.
    pub async fn find_user(&self, user_id: &str) -> Result<Option<UserRecord>, DbError> {
        let row = sqlx::query_as::<_, (String, Option<String>, Option<String>)>(
            r#"
            SELECT id, name, email
            FROM users
            WHERE id = ?
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(id, name, email)| UserRecord { id, name, email }))
    }
}
