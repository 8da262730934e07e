//! Session removal.

use super::super::{RoomActor, SessionId};
use tokio::sync::oneshot;
use tracing::info;

impl RoomActor {
    pub(crate) fn handle_teardown(
        &mut self,
        session_id: SessionId,
        reply_tx: Option<oneshot::Sender<bool>>,
    ) {
        let removed = self.remove_session(session_id, "connection closed");
        if let Some(tx) = reply_tx {
            let _ = tx.send(removed);
        }
    }

    /// Drop a session from the live set. Idempotent; returns whether it was live.
    pub(crate) fn remove_session(&mut self, session_id: SessionId, reason: &str) -> bool {
        let Some(session) = self.sessions.remove(&session_id) else {
            return false;
        };
        crate::metrics::dec_live_sessions();
        info!(
            session = %session_id,
            user = %session.user_id,
            reason,
            live = self.sessions.len(),
            "session removed"
        );
        true
    }
}
