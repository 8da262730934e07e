//! Caller side of a room coordinator.

use super::types::{InboundFrame, Outbound, RoomEvent, RoomId, Session, SessionId, SessionMetadata};
use crate::error::RoomError;
use tokio::sync::{mpsc, oneshot};

/// Cloneable handle to one room's coordinator task.
///
/// Every call is a message on the coordinator's mailbox, so calls from any
/// number of connections are applied one at a time in arrival order.
#[derive(Debug, Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    tx: mpsc::Sender<RoomEvent>,
}

impl RoomHandle {
    pub(super) fn new(room_id: RoomId, tx: mpsc::Sender<RoomEvent>) -> Self {
        Self { room_id, tx }
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// True once the coordinator task has stopped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Register a connection whose handshake has completed.
    pub async fn accept(
        &self,
        metadata: SessionMetadata,
        outbound: Outbound,
    ) -> Result<Session, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomEvent::Accept {
            metadata,
            outbound,
            reply_tx,
        })
        .await?;
        reply_rx.await.map_err(|_| RoomError::Unavailable)?
    }

    /// Hand an inbound frame to the coordinator.
    pub async fn handle(&self, session_id: SessionId, frame: InboundFrame) -> Result<(), RoomError> {
        self.send(RoomEvent::Frame { session_id, frame }).await
    }

    /// Remove a session. Returns whether it was still live.
    pub async fn teardown(&self, session_id: SessionId) -> Result<bool, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomEvent::Teardown {
            session_id,
            reply_tx: Some(reply_tx),
        })
        .await?;
        reply_rx.await.map_err(|_| RoomError::Unavailable)
    }

    /// Ids of the sessions currently live, after every earlier event.
    pub async fn live_sessions(&self) -> Result<Vec<SessionId>, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomEvent::LiveSessions { reply_tx }).await?;
        reply_rx.await.map_err(|_| RoomError::Unavailable)
    }

    async fn send(&self, event: RoomEvent) -> Result<(), RoomError> {
        self.tx.send(event).await.map_err(|_| RoomError::Unavailable)
    }
}
