//! roomcast - per-group real-time chat rooms.
//!
//! Each group's chat is governed by one room coordinator task that admits
//! authorized WebSocket connections, persists every message, and broadcasts
//! confirmed messages to all live sessions in a single, agreed order.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod metrics;
pub mod network;
pub mod state;
pub mod store;
pub mod telemetry;

use crate::auth::SqlOracle;
use crate::config::Config;
use crate::db::Database;
use crate::network::{Gateway, GatewayState};
use crate::state::RoomManager;
use crate::store::{MessageStore, NoOpStore, SqliteMessageStore};
use std::sync::Arc;
use tracing::info;

/// Wire the database-backed oracle and store into gateway state.
///
/// The configuration is validated first; queue capacities of zero and the
/// like are refused here rather than panicking inside a coordinator.
pub fn gateway_state(config: &Config, db: Database) -> anyhow::Result<GatewayState> {
    if let Err(errors) = config::validate(config) {
        let reasons: Vec<String> = errors.iter().map(ToString::to_string).collect();
        anyhow::bail!("invalid configuration: {}", reasons.join("; "));
    }

    let policy = config.rooms.policy();
    let store: Arc<dyn MessageStore> = if policy.persist {
        Arc::new(SqliteMessageStore::new(db.clone()))
    } else {
        info!("rooms.persist is off; messages will not be stored");
        Arc::new(NoOpStore)
    };

    let rooms = Arc::new(RoomManager::new(
        store,
        policy,
        config.rooms.mailbox_capacity,
    ));

    Ok(GatewayState {
        rooms,
        oracle: Arc::new(SqlOracle::new(db)),
        websocket: config.websocket.clone(),
        auth: config.auth.clone(),
        outbound_capacity: config.rooms.outbound_capacity,
    })
}

/// Build the gateway state and bind the listener.
pub async fn bind_gateway(config: &Config, db: Database) -> anyhow::Result<Gateway> {
    let state = gateway_state(config, db)?;
    Gateway::bind(config.listen.address, state).await
}
