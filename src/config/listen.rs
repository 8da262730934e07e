//! Network listener configuration.

use serde::Deserialize;
use std::net::SocketAddr;

use super::defaults::default_max_message_size;

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    /// Address to bind to (e.g., "0.0.0.0:8787").
    pub address: SocketAddr,
}

/// WebSocket upgrade configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebSocketConfig {
    /// Allowed origins for upgrade requests (e.g., `["https://example.com"]`).
    /// Empty list allows all origins.
    #[serde(default)]
    pub allow_origins: Vec<String>,
    /// Largest inbound frame accepted, in bytes.
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            allow_origins: Vec::new(),
            max_message_size: default_max_message_size(),
        }
    }
}

impl WebSocketConfig {
    /// Whether an upgrade request carrying `origin` may proceed.
    ///
    /// Requests without an `Origin` header (non-browser clients) are allowed.
    pub fn origin_allowed(&self, origin: Option<&str>) -> bool {
        if self.allow_origins.is_empty() {
            return true;
        }
        match origin {
            Some(origin) => self
                .allow_origins
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(origin)),
            None => true,
        }
    }
}
