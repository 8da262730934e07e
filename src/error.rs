//! Unified error handling for roomcast.
//!
//! This module provides the error hierarchy shared by the gateway and the
//! room coordinators, with HTTP refusal mapping and metric labeling.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::auth::Denial;

// ============================================================================
// Room Errors (coordinator calls)
// ============================================================================

/// Errors returned by a room coordinator handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    /// Connection metadata lacked a user id or room id.
    #[error("missing connection metadata")]
    MissingMetadata,

    /// The coordinator task is gone or did not reply.
    #[error("room coordinator unavailable")]
    Unavailable,
}

impl RoomError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingMetadata => "missing_metadata",
            Self::Unavailable => "room_unavailable",
        }
    }
}

// ============================================================================
// Upgrade Errors (refused connection attempts)
// ============================================================================

/// Reasons a connection attempt is refused before any session exists.
///
/// Refusals are answered with a JSON `{"message": ...}` body.
#[derive(Debug, Error)]
pub enum UpgradeError {
    /// The request is not a WebSocket upgrade.
    #[error("expected websocket upgrade")]
    NotUpgrade,

    /// The `Origin` header is not in `websocket.allow_origins`.
    #[error("origin not allowed: {0}")]
    OriginNotAllowed(String),

    /// The authorization oracle refused the caller.
    #[error("authorization denied: {0}")]
    Denied(#[from] Denial),

    /// The room coordinator refused or could not be reached.
    #[error("room error: {0}")]
    Room(#[from] RoomError),
}

impl UpgradeError {
    /// HTTP status answered for this refusal.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotUpgrade => StatusCode::UPGRADE_REQUIRED,
            Self::OriginNotAllowed(_) => StatusCode::FORBIDDEN,
            Self::Denied(Denial::Unauthenticated) => StatusCode::UNAUTHORIZED,
            Self::Denied(Denial::NotFound) => StatusCode::NOT_FOUND,
            Self::Denied(Denial::Forbidden) => StatusCode::FORBIDDEN,
            Self::Denied(Denial::Unavailable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Room(RoomError::MissingMetadata) => StatusCode::BAD_REQUEST,
            Self::Room(RoomError::Unavailable) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotUpgrade => "not_upgrade",
            Self::OriginNotAllowed(_) => "origin_not_allowed",
            Self::Denied(denial) => denial.error_code(),
            Self::Room(err) => err.error_code(),
        }
    }

    /// Text returned to the caller.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NotUpgrade => "Expected websocket Upgrade header",
            Self::OriginNotAllowed(_) => "Origin not allowed",
            Self::Denied(Denial::Unauthenticated) => "Log in to access the chat",
            Self::Denied(Denial::NotFound) => "Group not found",
            Self::Denied(Denial::Forbidden) => "You cannot join this chat",
            Self::Denied(Denial::Unavailable(_)) | Self::Room(RoomError::Unavailable) => {
                "Chat backend unavailable"
            }
            Self::Room(RoomError::MissingMetadata) => "Missing connection metadata",
        }
    }
}

impl IntoResponse for UpgradeError {
    fn into_response(self) -> Response {
        let status = self.status();
        crate::metrics::record_refusal(status.as_u16());
        (
            status,
            Json(serde_json::json!({ "message": self.user_message() })),
        )
            .into_response()
    }
}
