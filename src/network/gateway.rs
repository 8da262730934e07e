//! Gateway - HTTP listener serving the room upgrade endpoint.
//!
//! The Gateway binds the listener and serves an axum router. Upgrade
//! requests are authorized before the handshake completes; accepted
//! connections are handed to their room coordinator.

use crate::auth::AuthorizationOracle;
use crate::config::{AuthConfig, WebSocketConfig};
use crate::state::RoomManager;
use axum::Router;
use axum::routing::get;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, instrument};

use super::upgrade::room_upgrade;

/// Everything an upgrade request needs, shared by all requests.
pub struct GatewayState {
    pub rooms: Arc<RoomManager>,
    pub oracle: Arc<dyn AuthorizationOracle>,
    pub websocket: WebSocketConfig,
    pub auth: AuthConfig,
    /// Capacity of each session's outbound queue.
    pub outbound_capacity: usize,
}

/// The Gateway accepts HTTP connections and upgrades chat requests.
pub struct Gateway {
    listener: TcpListener,
    state: Arc<GatewayState>,
}

impl Gateway {
    /// Bind the gateway to the specified address.
    pub async fn bind(addr: SocketAddr, state: GatewayState) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!(address = %listener.local_addr()?, "HTTP listener bound");
        Ok(Self {
            listener,
            state: Arc::new(state),
        })
    }

    /// Address actually bound (useful with port 0).
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Shared state served by this gateway.
    pub fn state(&self) -> Arc<GatewayState> {
        self.state.clone()
    }

    /// The application router.
    pub fn router(state: Arc<GatewayState>) -> Router {
        Router::new()
            .route("/ws/rooms/:slug", get(room_upgrade))
            .merge(crate::http::routes())
            .with_state(state)
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests.
    #[instrument(skip_all, name = "gateway")]
    pub async fn run<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = Self::router(self.state);
        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;
        info!("gateway stopped");
        Ok(())
    }
}
