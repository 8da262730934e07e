//! SQLite-backed message store.

use super::{MessageStore, StoreError, StoredMessage};
use crate::db::Database;
use async_trait::async_trait;
use tracing::debug;

/// Appends messages to the `messages` table.
#[derive(Clone)]
pub struct SqliteMessageStore {
    db: Database,
}

impl SqliteMessageStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MessageStore for SqliteMessageStore {
    async fn append(&self, message: StoredMessage) -> Result<(), StoreError> {
        self.db.messages().insert(&message).await?;
        debug!(room = %message.room_id, msgid = %message.id, "message persisted");
        Ok(())
    }
}
