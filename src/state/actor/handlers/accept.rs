//! Session admission.

use super::super::{
    Outbound, RoomActor, Session, SessionHandle, SessionId, SessionMetadata,
};
use crate::error::RoomError;
use roomcast_proto::{ServerFrame, compute_initials};
use tokio::sync::oneshot;
use tracing::{debug, info};
use uuid::Uuid;

impl RoomActor {
    pub(crate) fn handle_accept(
        &mut self,
        metadata: SessionMetadata,
        outbound: Outbound,
        reply_tx: oneshot::Sender<Result<Session, RoomError>>,
    ) {
        if metadata.user_id.trim().is_empty() || metadata.room_id.is_empty() {
            let _ = reply_tx.send(Err(RoomError::MissingMetadata));
            return;
        }

        let mut session_id: SessionId = Uuid::new_v4();
        while self.sessions.contains_key(&session_id) {
            session_id = Uuid::new_v4();
        }

        let initials = compute_initials(Some(&metadata.display_name));
        let session = Session {
            id: session_id,
            room_id: self.room_id.clone(),
            user_id: metadata.user_id,
            display_name: metadata.display_name,
            initials: initials.clone(),
        };

        self.sessions.insert(
            session_id,
            SessionHandle {
                user_id: session.user_id.clone(),
                initials,
                outbound,
            },
        );
        crate::metrics::inc_live_sessions();

        if self.policy.announce_session {
            self.unicast(session_id, &ServerFrame::connected(session_id.to_string()));
        }

        let user_id = session.user_id.clone();
        if reply_tx.send(Ok(session)).is_err() {
            // The connection went away before it could start pumping.
            debug!(session = %session_id, "accept reply dropped");
            self.remove_session(session_id, "caller gone");
            return;
        }

        info!(
            session = %session_id,
            user = %user_id,
            live = self.sessions.len(),
            "session accepted"
        );
    }
}
