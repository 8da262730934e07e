//! Room actor event handlers.
//!
//! Each submodule handles a category of [`RoomEvent`](super::RoomEvent)
//! messages processed by [`RoomActor`](super::RoomActor).

pub mod accept;
pub mod broadcast;
pub mod message;
pub mod teardown;
