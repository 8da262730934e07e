//! Default value functions for configuration.

/// Returns `true` (for serde defaults).
pub fn default_true() -> bool {
    true
}

// =============================================================================
// Server Defaults
// =============================================================================

pub fn default_server_name() -> String {
    "roomcast".to_string()
}

pub fn default_database_path() -> String {
    "roomcast.db".to_string()
}

// =============================================================================
// WebSocket Defaults
// =============================================================================

/// Largest accepted inbound frame, in bytes.
pub fn default_max_message_size() -> usize {
    64 * 1024
}

// =============================================================================
// Auth Defaults
// =============================================================================

pub fn default_cookie_name() -> String {
    "session".to_string()
}

// =============================================================================
// Room Defaults
// =============================================================================

pub fn default_mailbox_capacity() -> usize {
    256
}

pub fn default_outbound_capacity() -> usize {
    64
}
