//! Inbound frame handling.
//!
//! Parses a session's frame, answers pings, and runs accepted messages
//! through persist-then-broadcast. Every failure is reported to the sending
//! session only and leaves the connection open.

use super::super::{InboundFrame, RoomActor, SessionId};
use crate::store::StoredMessage;
use crate::telemetry::FrameTimer;
use chrono::Utc;
use roomcast_proto::{ClientFrame, FrameError, MessageRecord, PERSIST_FAILED, ServerFrame};
use tracing::{debug, warn};
use uuid::Uuid;

impl RoomActor {
    pub(crate) async fn handle_frame(&mut self, session_id: SessionId, frame: InboundFrame) {
        let mut timer = FrameTimer::new("rejected");

        let Some(session) = self.sessions.get(&session_id) else {
            debug!(session = %session_id, "frame for unknown session ignored");
            return;
        };
        let author_id = session.user_id.clone();
        let initials = session.initials.clone();

        let parsed = match frame {
            InboundFrame::Text(raw) => ClientFrame::parse(&raw),
            InboundFrame::Binary => Err(FrameError::Binary),
        };

        match parsed {
            Err(err) => {
                debug!(session = %session_id, error = %err, "frame rejected");
                crate::metrics::record_rejected_frame(err.error_code());
                self.unicast(session_id, &ServerFrame::error(err.user_message()));
            }
            Ok(ClientFrame::Ping) => {
                timer.set_kind("ping");
                let ts = Utc::now().timestamp_millis();
                self.unicast(session_id, &ServerFrame::Pong { ts });
            }
            Ok(ClientFrame::Message { body }) => {
                timer.set_kind("message");
                self.handle_message(session_id, author_id, initials, body)
                    .await;
            }
        }
    }

    async fn handle_message(
        &mut self,
        session_id: SessionId,
        author_id: String,
        initials: String,
        body: String,
    ) {
        let message = StoredMessage {
            id: Uuid::new_v4().to_string(),
            room_id: self.room_id.clone(),
            author_id,
            body,
            created_at: Utc::now().timestamp(),
        };

        if self.policy.persist {
            if let Err(err) = self.store.append(message.clone()).await {
                warn!(
                    session = %session_id,
                    msgid = %message.id,
                    error = %err,
                    "message not persisted, broadcast suppressed"
                );
                crate::metrics::record_store_failure(err.error_code());
                self.unicast(session_id, &ServerFrame::error(PERSIST_FAILED));
                return;
            }
            crate::metrics::inc_messages_persisted();
        }

        let frame = ServerFrame::Message {
            payload: MessageRecord {
                id: message.id,
                body: message.body,
                author_id: message.author_id,
                initials,
            },
        };
        let exclude = (!self.policy.echo_sender).then_some(session_id);
        let recipients = self.broadcast(&frame, exclude);
        debug!(session = %session_id, recipients, "message broadcast");
    }
}
