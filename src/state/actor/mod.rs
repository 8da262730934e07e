//! Actor Model for Room State Management.
//!
//! This module implements the `RoomActor`, the single writer for one group's
//! chat room. It runs in its own Tokio task and owns the live-session table.
//!
//! # Architecture
//!
//! - **State Ownership**: The `RoomActor` owns the sessions of its room and
//!   the outbound queue of each.
//! - **Message Passing**: Connections interact with it through [`RoomHandle`],
//!   which turns every call into a [`RoomEvent`] on the actor's mailbox.
//! - **Ordering**: Events run to completion one at a time. A message frame
//!   awaits the store inside the loop, so persist-then-broadcast is atomic for
//!   every observer and broadcast order equals mailbox order.
//! - **Concurrency**: Each room runs on its own task; rooms never block each
//!   other.

use crate::store::MessageStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{Instrument, debug};

mod handle;
mod handlers;
mod types;


pub use handle::RoomHandle;
pub use types::*;

/// Bookkeeping for one live session.
#[derive(Debug)]
pub(crate) struct SessionHandle {
    pub user_id: String,
    pub initials: String,
    pub outbound: Outbound,
}

/// The Room Actor.
///
/// Owns the live sessions of a single room and processes events sequentially.
pub struct RoomActor {
    room_id: RoomId,
    sessions: HashMap<SessionId, SessionHandle>,
    store: Arc<dyn MessageStore>,
    policy: RoomPolicy,
}

impl RoomActor {
    /// Create a new Room Actor and spawn it.
    pub fn spawn(
        room_id: RoomId,
        store: Arc<dyn MessageStore>,
        policy: RoomPolicy,
        capacity: usize,
    ) -> RoomHandle {
        let (tx, rx) = mpsc::channel(capacity);

        let actor = Self {
            room_id: room_id.clone(),
            sessions: HashMap::new(),
            store,
            policy,
        };

        let span = crate::telemetry::spans::room(room_id.as_str());
        tokio::spawn(actor.run(rx).instrument(span));

        RoomHandle::new(room_id, tx)
    }

    /// The main actor loop.
    pub async fn run(mut self, mut rx: mpsc::Receiver<RoomEvent>) {
        debug!("room coordinator started");
        while let Some(event) = rx.recv().await {
            self.handle_event(event).await;
        }
        for session_id in self.sessions.keys().copied().collect::<Vec<_>>() {
            self.remove_session(session_id, "coordinator stopped");
        }
        debug!("room coordinator stopped");
    }

    async fn handle_event(&mut self, event: RoomEvent) {
        match event {
            RoomEvent::Accept {
                metadata,
                outbound,
                reply_tx,
            } => {
                self.handle_accept(metadata, outbound, reply_tx);
            }
            RoomEvent::Frame { session_id, frame } => {
                self.handle_frame(session_id, frame).await;
            }
            RoomEvent::Teardown {
                session_id,
                reply_tx,
            } => {
                self.handle_teardown(session_id, reply_tx);
            }
            RoomEvent::LiveSessions { reply_tx } => {
                let _ = reply_tx.send(self.sessions.keys().copied().collect());
            }
        }
    }
}
