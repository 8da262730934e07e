//! Frame delivery to sessions.
//!
//! Deliveries never block the coordinator. A session whose queue is full or
//! closed is evicted: a reader that fell behind would otherwise miss frames
//! while still looking connected. Dropping the session's sender ends its
//! connection pump once the queued frames are flushed, and the client
//! reconnects.

use super::super::{Outbound, RoomActor, SessionId};
use roomcast_proto::ServerFrame;
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::warn;

enum Delivery {
    Sent,
    Evict(&'static str),
}

fn encode(frame: &ServerFrame) -> Option<Arc<str>> {
    match frame.encode() {
        Ok(text) => Some(text.into()),
        Err(e) => {
            warn!(error = %e, "failed to encode frame");
            None
        }
    }
}

impl RoomActor {
    /// Send a frame to every live session, optionally skipping one.
    /// Returns the number of sessions the frame was queued for.
    pub(crate) fn broadcast(&mut self, frame: &ServerFrame, exclude: Option<SessionId>) -> usize {
        let Some(text) = encode(frame) else {
            return 0;
        };

        let mut delivered = 0;
        let mut evicted = Vec::new();
        for (session_id, session) in &self.sessions {
            if exclude == Some(*session_id) {
                continue;
            }
            match deliver(*session_id, &session.outbound, text.clone()) {
                Delivery::Sent => delivered += 1,
                Delivery::Evict(reason) => evicted.push((*session_id, reason)),
            }
        }

        for (session_id, reason) in evicted {
            self.remove_session(session_id, reason);
        }

        crate::metrics::record_fanout(delivered);
        delivered
    }

    /// Send a frame to one session.
    pub(crate) fn unicast(&mut self, session_id: SessionId, frame: &ServerFrame) {
        let Some(session) = self.sessions.get(&session_id) else {
            return;
        };
        let Some(text) = encode(frame) else {
            return;
        };
        if let Delivery::Evict(reason) = deliver(session_id, &session.outbound, text) {
            self.remove_session(session_id, reason);
        }
    }
}

fn deliver(session_id: SessionId, outbound: &Outbound, text: Arc<str>) -> Delivery {
    match outbound.try_send(text) {
        Ok(()) => Delivery::Sent,
        Err(TrySendError::Full(_)) => {
            warn!(session = %session_id, "outbound queue full, evicting slow session");
            crate::metrics::inc_slow_evictions();
            Delivery::Evict("outbound full")
        }
        Err(TrySendError::Closed(_)) => Delivery::Evict("outbound closed"),
    }
}
