use crate::error::RoomError;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

/// Identity of a room; all connections for one group share it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(Arc<str>);

impl RoomId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<String> for RoomId {
    fn from(id: String) -> Self {
        Self(id.into())
    }
}

impl From<&str> for RoomId {
    fn from(id: &str) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Coordinator-generated session identifier, unique within a room.
pub type SessionId = Uuid;

/// Bounded queue of encoded frames owned by one session's connection.
pub type Outbound = mpsc::Sender<Arc<str>>;

/// What the gateway knows about a caller once authorized.
#[derive(Debug, Clone)]
pub struct SessionMetadata {
    pub room_id: RoomId,
    pub user_id: String,
    pub display_name: String,
}

/// A session accepted into a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub room_id: RoomId,
    pub user_id: String,
    pub display_name: String,
    /// Derived from the display name at accept; fixed for the session's life.
    pub initials: String,
}

/// Per-room broadcast policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomPolicy {
    /// Append to the message store before broadcasting.
    pub persist: bool,
    /// Include the sender in its own broadcast.
    pub echo_sender: bool,
    /// Send the `connected` system frame on accept.
    pub announce_session: bool,
}

impl Default for RoomPolicy {
    fn default() -> Self {
        Self {
            persist: true,
            echo_sender: true,
            announce_session: true,
        }
    }
}

/// One inbound WebSocket data frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    Text(String),
    Binary,
}

/// Events that can be sent to a Room Actor.
#[derive(Debug)]
pub enum RoomEvent {
    /// A connection finished its handshake.
    Accept {
        metadata: SessionMetadata,
        outbound: Outbound,
        reply_tx: oneshot::Sender<Result<Session, RoomError>>,
    },
    /// A frame arrived on a session's connection.
    Frame {
        session_id: SessionId,
        frame: InboundFrame,
    },
    /// A session's connection closed.
    Teardown {
        session_id: SessionId,
        /// Receives whether the session was still live.
        reply_tx: Option<oneshot::Sender<bool>>,
    },
    /// Request the ids of the live sessions.
    LiveSessions {
        reply_tx: oneshot::Sender<Vec<SessionId>>,
    },
}
