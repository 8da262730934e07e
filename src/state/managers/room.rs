//! Room management state.
//!
//! This module contains the `RoomManager`, the registry that routes every
//! connection for a room to that room's single coordinator.

use crate::state::actor::{RoomActor, RoomHandle, RoomId, RoomPolicy};
use crate::store::MessageStore;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use tracing::{info, warn};

/// Room registry.
///
/// Coordinators are created lazily on the first connection for a room and
/// stay resident for the life of the process.
pub struct RoomManager {
    /// All rooms, indexed by room identity.
    rooms: DashMap<RoomId, RoomHandle>,
    store: Arc<dyn MessageStore>,
    policy: RoomPolicy,
    mailbox_capacity: usize,
}

impl RoomManager {
    /// Create a new RoomManager.
    pub fn new(store: Arc<dyn MessageStore>, policy: RoomPolicy, mailbox_capacity: usize) -> Self {
        Self {
            rooms: DashMap::new(),
            store,
            policy,
            mailbox_capacity,
        }
    }

    /// Get the coordinator for a room, spawning it on first use.
    ///
    /// Insertion goes through the map entry, which holds the shard lock, so
    /// concurrent first connections cannot spawn two coordinators.
    pub fn get_or_create(&self, room_id: &RoomId) -> RoomHandle {
        if let Some(handle) = self.rooms.get(room_id)
            && !handle.is_closed()
        {
            return handle.clone();
        }

        match self.rooms.entry(room_id.clone()) {
            Entry::Occupied(mut entry) => {
                if entry.get().is_closed() {
                    warn!(room = %room_id, "room coordinator stopped, respawning");
                    entry.insert(self.spawn(room_id));
                }
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                crate::metrics::inc_active_rooms();
                info!(room = %room_id, "room coordinator created");
                entry.insert(self.spawn(room_id)).value().clone()
            }
        }
    }

    /// Get an existing coordinator.
    pub fn get(&self, room_id: &RoomId) -> Option<RoomHandle> {
        self.rooms.get(room_id).map(|h| h.value().clone())
    }

    /// Number of rooms with a coordinator.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn policy(&self) -> RoomPolicy {
        self.policy
    }

    fn spawn(&self, room_id: &RoomId) -> RoomHandle {
        RoomActor::spawn(
            room_id.clone(),
            self.store.clone(),
            self.policy,
            self.mailbox_capacity,
        )
    }
}
