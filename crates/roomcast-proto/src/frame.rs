//! JSON frames exchanged over a room connection.
//!
//! Client → coordinator:
//!
//! ```text
//! {"type":"message","body":"Oi"}
//! {"type":"ping"}
//! ```
//!
//! Coordinator → client:
//!
//! ```text
//! {"type":"message","payload":{"id":"…","body":"Oi","authorId":"u1","initials":"AS"}}
//! {"type":"error","message":"Type something before sending."}
//! {"type":"system","message":"connected","id":"…"}
//! {"type":"pong","ts":1700000000000}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FrameError, Result};

/// Normalized form of a confirmed message, as broadcast and rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    /// Coordinator-generated message id.
    pub id: String,
    /// Trimmed message text.
    pub body: String,
    /// User id of the author.
    pub author_id: String,
    /// Avatar initials derived from the author's display name.
    pub initials: String,
}

/// Frames sent by a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientFrame {
    /// A chat message. `body` is already trimmed and non-empty once parsed.
    Message {
        /// Message text.
        body: String,
    },
    /// Liveness probe answered with [`ServerFrame::Pong`].
    Ping,
}

impl ClientFrame {
    /// Build a message frame from user input.
    pub fn message(body: impl Into<String>) -> Self {
        Self::Message { body: body.into() }
    }

    /// Parse and validate a raw text frame.
    ///
    /// String bodies are used as is, numbers and booleans are stringified,
    /// a missing or null body counts as empty. Any other body shape is a
    /// protocol violation.
    pub fn parse(raw: &str) -> Result<Self, FrameError> {
        let value: Value = serde_json::from_str(raw).map_err(|_| FrameError::Malformed)?;
        let Value::Object(fields) = value else {
            return Err(FrameError::Malformed);
        };

        match fields.get("type") {
            Some(Value::String(kind)) if kind == "ping" => Ok(Self::Ping),
            Some(Value::String(kind)) if kind == "message" => {
                let body = match fields.get("body") {
                    None | Some(Value::Null) => String::new(),
                    Some(Value::String(text)) => text.clone(),
                    Some(Value::Number(n)) => n.to_string(),
                    Some(Value::Bool(b)) => b.to_string(),
                    Some(_) => return Err(FrameError::InvalidBody),
                };
                let body = body.trim();
                if body.is_empty() {
                    return Err(FrameError::EmptyBody);
                }
                Ok(Self::Message {
                    body: body.to_string(),
                })
            }
            Some(Value::String(kind)) => Err(FrameError::UnknownType(kind.clone())),
            Some(other) => Err(FrameError::UnknownType(other.to_string())),
            None => Err(FrameError::MissingType),
        }
    }

    /// Serialize to the JSON text sent on the wire.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Frames sent by a room coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerFrame {
    /// A persisted message, delivered to every live session.
    Message {
        /// The confirmed message.
        payload: MessageRecord,
    },
    /// A failure reported only to the session that caused it.
    Error {
        /// Human readable reason.
        message: String,
    },
    /// Session bookkeeping notice.
    System {
        /// Notice text, `connected` on accept.
        message: String,
        /// The session id the coordinator allocated.
        id: String,
    },
    /// Reply to [`ClientFrame::Ping`].
    Pong {
        /// Coordinator wall clock in milliseconds.
        ts: i64,
    },
}

impl ServerFrame {
    /// Error frame with the given text.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Notice sent to a freshly accepted session.
    pub fn connected(session_id: impl Into<String>) -> Self {
        Self::System {
            message: "connected".to_string(),
            id: session_id.into(),
        }
    }

    /// Serialize to the JSON text sent on the wire.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a frame received from a coordinator.
    pub fn decode(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}
