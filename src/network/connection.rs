//! Per-connection frame pump.
//!
//! Registers the upgraded socket with its room, then moves frames in both
//! directions until either side goes away. The session is torn down exactly
//! once on the way out, whatever ended the connection.

use crate::state::{InboundFrame, RoomHandle, Session, SessionMetadata};
use crate::telemetry::spans;
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{Instrument, debug, info, warn};

pub(super) async fn serve(
    socket: WebSocket,
    room: RoomHandle,
    metadata: SessionMetadata,
    outbound_capacity: usize,
) {
    let (outbound, outbound_rx) = mpsc::channel::<Arc<str>>(outbound_capacity);

    let session = match room.accept(metadata, outbound).await {
        Ok(session) => session,
        Err(err) => {
            warn!(room = %room.room_id(), error = %err, "session not accepted");
            let _ = socket.close().await;
            return;
        }
    };

    let span = spans::connection(
        session.room_id.as_str(),
        &session.id.to_string(),
        &session.user_id,
    );
    pump(socket, room, session, outbound_rx).instrument(span).await;
}

async fn pump(
    socket: WebSocket,
    room: RoomHandle,
    session: Session,
    mut outbound_rx: mpsc::Receiver<Arc<str>>,
) {
    let (mut sink, mut stream) = socket.split();
    info!("connection open");

    let reason = loop {
        tokio::select! {
            outbound = outbound_rx.recv() => match outbound {
                Some(text) => {
                    if let Err(e) = sink.send(Message::Text(text.to_string())).await {
                        debug!(error = %e, "write failed");
                        break "write failed";
                    }
                }
                // The coordinator dropped the session.
                None => break "removed by room",
            },
            inbound = stream.next() => {
                let frame = match inbound {
                    Some(Ok(Message::Text(text))) => InboundFrame::Text(text),
                    Some(Ok(Message::Binary(_))) => InboundFrame::Binary,
                    Some(Ok(Message::Close(_))) | None => break "closed by peer",
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        debug!(error = %e, "read failed");
                        break "read failed";
                    }
                };
                if room.handle(session.id, frame).await.is_err() {
                    break "room unavailable";
                }
            }
        }
    };

    match room.teardown(session.id).await {
        Ok(_) => info!(reason, "connection closed"),
        Err(err) => warn!(reason, error = %err, "teardown failed"),
    }
    let _ = sink.close().await;
}
