//! Error types for the roomcast protocol library.
//!
//! [`FrameError`] covers inbound frames a coordinator refuses, [`ProtocolError`]
//! covers encoding and decoding failures, and [`SendError`] is returned to a
//! participant whose message could not be transmitted.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Reply sent for frames the coordinator cannot interpret.
pub const UNSUPPORTED_PAYLOAD: &str = "Unsupported payload.";

/// Reply sent for message frames whose body is blank.
pub const EMPTY_BODY: &str = "Type something before sending.";

/// Reply sent when a message could not be persisted.
pub const PERSIST_FAILED: &str = "Could not send right now.";

/// Errors produced while decoding or encoding frames.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// JSON (de)serialization failed.
    #[error("invalid json frame: {0}")]
    Json(#[from] serde_json::Error),

    /// The chat endpoint could not be turned into a WebSocket URL.
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint {
        /// The endpoint that was supplied.
        endpoint: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Reasons an inbound client frame is refused.
///
/// Every variant except [`FrameError::EmptyBody`] is a protocol violation;
/// an empty body is a validation failure. In both cases the sender receives
/// a single error frame and nothing is persisted or broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// Payload was not a JSON object.
    #[error("malformed frame")]
    Malformed,

    /// Payload arrived as a binary frame.
    #[error("binary frames are not supported")]
    Binary,

    /// JSON object carried no `type` discriminator.
    #[error("frame has no type")]
    MissingType,

    /// `type` names a kind the coordinator does not handle.
    #[error("unknown frame type: {0}")]
    UnknownType(String),

    /// `body` had a shape that cannot be read as text.
    #[error("message body is not text")]
    InvalidBody,

    /// `body` was missing or blank after trimming.
    #[error("message body is empty")]
    EmptyBody,
}

impl FrameError {
    /// Static code for metrics labelling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::Binary => "binary",
            Self::MissingType => "missing_type",
            Self::UnknownType(_) => "unknown_type",
            Self::InvalidBody => "invalid_body",
            Self::EmptyBody => "empty_body",
        }
    }

    /// True for validation failures, false for protocol violations.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyBody)
    }

    /// Text shown to the participant that sent the frame.
    pub fn user_message(&self) -> &'static str {
        if self.is_validation() {
            EMPTY_BODY
        } else {
            UNSUPPORTED_PAYLOAD
        }
    }
}

/// Why a participant's outbound message was not transmitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    /// The input was blank after trimming; nothing to send.
    #[error("nothing to send")]
    Empty,

    /// The connection is not open. The input is handed back untouched so
    /// the caller can keep it for a later attempt.
    #[error("connection unavailable")]
    Unavailable {
        /// The text that was not sent.
        unsent: String,
    },
}
