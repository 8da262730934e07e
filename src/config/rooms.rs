//! Room coordinator configuration.

use serde::Deserialize;

use super::defaults::{default_mailbox_capacity, default_outbound_capacity, default_true};
use crate::state::RoomPolicy;

/// Room coordinator behaviour and queue sizing.
///
/// ```toml
/// [rooms]
/// persist = true           # false: messages are broadcast but never stored
/// echo_sender = true       # false: the sender does not receive its own message
/// announce_session = true  # send {"type":"system","message":"connected"} on accept
/// mailbox_capacity = 256
/// outbound_capacity = 64
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RoomsConfig {
    /// Persist messages before broadcasting them.
    #[serde(default = "default_true")]
    pub persist: bool,
    /// Deliver a message back to its sender.
    #[serde(default = "default_true")]
    pub echo_sender: bool,
    /// Greet new sessions with a system frame carrying their session id.
    #[serde(default = "default_true")]
    pub announce_session: bool,
    /// Pending events a coordinator buffers before callers wait.
    #[serde(default = "default_mailbox_capacity")]
    pub mailbox_capacity: usize,
    /// Frames buffered per session before a slow reader is evicted.
    #[serde(default = "default_outbound_capacity")]
    pub outbound_capacity: usize,
}

impl Default for RoomsConfig {
    fn default() -> Self {
        Self {
            persist: true,
            echo_sender: true,
            announce_session: true,
            mailbox_capacity: default_mailbox_capacity(),
            outbound_capacity: default_outbound_capacity(),
        }
    }
}

impl RoomsConfig {
    /// The per-room policy handed to every coordinator.
    pub fn policy(&self) -> RoomPolicy {
        RoomPolicy {
            persist: self.persist,
            echo_sender: self.echo_sender,
            announce_session: self.announce_session,
        }
    }
}
