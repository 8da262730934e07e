//! State management module.
//!
//! Contains the room coordinators and the manager that keeps exactly one
//! coordinator per room.

pub mod actor;
pub mod managers;

pub use actor::{
    InboundFrame, Outbound, RoomActor, RoomEvent, RoomHandle, RoomId, RoomPolicy, Session,
    SessionId, SessionMetadata,
};
pub use managers::RoomManager;
