//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, ServerConfig, DatabaseConfig, AuthConfig)
//! - [`listen`]: Network listener configuration (ListenConfig, WebSocketConfig)
//! - [`rooms`]: Room coordinator policy and queue sizing (RoomsConfig)
//! - [`validation`]: Startup checks returning every problem found

mod defaults;
mod listen;
mod rooms;
mod types;
pub mod validation;

pub use listen::{ListenConfig, WebSocketConfig};
pub use rooms::RoomsConfig;
pub use types::{AuthConfig, Config, ConfigError, DatabaseConfig, ServerConfig};
pub use validation::{ValidationError, validate};
