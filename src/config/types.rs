//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::defaults::{default_cookie_name, default_database_path, default_server_name};
use super::listen::{ListenConfig, WebSocketConfig};
use super::rooms::RoomsConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server information.
    #[serde(default)]
    pub server: ServerConfig,
    /// HTTP listen configuration.
    pub listen: ListenConfig,
    /// WebSocket upgrade configuration.
    #[serde(default)]
    pub websocket: WebSocketConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Caller identity extraction.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Room coordinator policy.
    #[serde(default)]
    pub rooms: RoomsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Server identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Name reported in logs (e.g., "chat.natal.example").
    #[serde(default = "default_server_name")]
    pub name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file, or `:memory:`.
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

/// How the gateway learns who is connecting.
///
/// Identity comes from the session cookie issued by the surrounding
/// application. `allow_query_identity` additionally accepts a `userId` query
/// parameter, which is only safe behind a trusted proxy.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Cookie carrying the caller's user id.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Fall back to the `userId` query parameter when no cookie is present.
    #[serde(default)]
    pub allow_query_identity: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            allow_query_identity: false,
        }
    }
}
