//! Domain managers for server state.

pub mod room;

pub use room::RoomManager;
