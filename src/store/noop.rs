//! No-op message store that discards all messages.
//!
//! Used for ephemeral rooms (`rooms.persist = false`).
//! Every append succeeds but nothing is stored.

use super::{MessageStore, StoreError, StoredMessage};
use async_trait::async_trait;

pub struct NoOpStore;

#[async_trait]
impl MessageStore for NoOpStore {
    async fn append(&self, _message: StoredMessage) -> Result<(), StoreError> {
        Ok(())
    }
}
