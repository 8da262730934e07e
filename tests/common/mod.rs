//! Integration test common infrastructure.
//!
//! Provides an in-process gateway over a seeded SQLite file and a
//! WebSocket participant for asserting on frame flows.

pub mod client;
pub mod server;

#[allow(unused_imports)]
pub use client::TestClient;
#[allow(unused_imports)]
pub use server::TestServer;
