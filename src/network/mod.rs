//! Network module.
//!
//! Contains the Gateway (HTTP listener), the upgrade checks that run before
//! a session exists, and the per-connection frame pump.

mod connection;
mod gateway;
mod upgrade;

pub use gateway::{Gateway, GatewayState};
pub use upgrade::ConnectParams;
