//! Message store abstraction.
//!
//! Room coordinators persist every accepted message through a
//! [`MessageStore`] before broadcasting it. Stores are append-only.

use async_trait::async_trait;
use thiserror::Error;

use crate::state::RoomId;

pub mod noop;
pub mod sqlite;

pub use noop::NoOpStore;
pub use sqlite::SqliteMessageStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] crate::db::DbError),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Database(_) => "database",
            Self::Unavailable(_) => "unavailable",
        }
    }
}

/// A chat message as persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    /// Coordinator-generated message id.
    pub id: String,
    /// Room the message was sent to.
    pub room_id: RoomId,
    /// User id of the author.
    pub author_id: String,
    /// Trimmed, non-empty body.
    pub body: String,
    /// Unix timestamp (seconds).
    pub created_at: i64,
}

#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Durably append one message. Must not return before the write is done.
    async fn append(&self, message: StoredMessage) -> Result<(), StoreError>;
}
