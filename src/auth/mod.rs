//! Connection authorization.
//!
//! Every connection attempt is checked exactly once, before a session
//! exists, by an [`AuthorizationOracle`]: given the room slug from the URL
//! and the caller identity, it either names the room to join or denies.

use async_trait::async_trait;
use thiserror::Error;

use crate::state::RoomId;

pub mod sql;

pub use sql::SqlOracle;

/// A caller allowed into a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization {
    /// Room identity the connection is routed to.
    pub room_id: RoomId,
    /// Display name known for the caller, if any.
    pub display_name: Option<String>,
}

/// Why a caller may not join.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Denial {
    #[error("caller identity missing")]
    Unauthenticated,
    #[error("room not found")]
    NotFound,
    #[error("caller is not a participant")]
    Forbidden,
    #[error("authorization backend unavailable: {0}")]
    Unavailable(String),
}

impl Denial {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::Unavailable(_) => "auth_unavailable",
        }
    }
}

#[async_trait]
pub trait AuthorizationOracle: Send + Sync {
    /// Decide whether `caller` may join the room named `slug`.
    async fn resolve(&self, slug: &str, caller: Option<&str>) -> Result<Authorization, Denial>;
}
