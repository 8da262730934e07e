//! # roomcast-proto
//!
//! Wire protocol and client-side plumbing for roomcast group chat.
//!
//! ## Features
//!
//! - JSON frame types exchanged between a participant and a room coordinator
//! - Message records and avatar initials derived from display names
//! - HTML rendering of confirmed messages as chat bubbles
//! - A sans-IO reconnection state machine for participants
//! - Optional Tokio driver running the state machine over a WebSocket
//!
//! ## Quick Start
//!
//! ```rust
//! use roomcast_proto::{ClientFrame, ServerFrame};
//!
//! let frame = ClientFrame::parse(r#"{"type":"message","body":"  Oi  "}"#).unwrap();
//! assert_eq!(frame, ClientFrame::Message { body: "Oi".to_string() });
//!
//! let reply = ServerFrame::error("Type something before sending.");
//! assert!(reply.encode().unwrap().contains(r#""type":"error""#));
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod frame;
pub mod initials;
pub mod reconnect;
pub mod render;

#[cfg(feature = "tokio")]
pub mod client;

pub use self::error::{
    FrameError, ProtocolError, SendError, EMPTY_BODY, PERSIST_FAILED, UNSUPPORTED_PAYLOAD,
};
pub use self::frame::{ClientFrame, MessageRecord, ServerFrame};
pub use self::initials::{compute_initials, UNKNOWN_INITIALS};
pub use self::reconnect::{
    Action, ConnectionState, Desired, ReconnectConfig, Reconnector, TimerToken,
    DEFAULT_RETRY_DELAY,
};
pub use self::render::{escape_html, format_body, render_message_bubble, render_message_list};

#[cfg(feature = "tokio")]
pub use self::client::{ChatClient, ClientEvent};
