//! Upgrade request checks.
//!
//! Runs once per connection attempt, before any session exists:
//! upgrade header, origin, caller identity, authorization, metadata. Any
//! failure answers with a JSON refusal and the room is never contacted.

use super::connection;
use super::gateway::GatewayState;
use crate::error::{RoomError, UpgradeError};
use crate::state::SessionMetadata;
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::http::header::ORIGIN;
use axum::response::Response;
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Display name used when neither the oracle nor the client supplies one.
pub const DEFAULT_DISPLAY_NAME: &str = "Participant";

/// Query parameters sent by chat clients.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectParams {
    /// Caller identity, honoured only with `auth.allow_query_identity`.
    pub user_id: Option<String>,
    /// Informational; the room is resolved from the slug.
    pub group_id: Option<String>,
    /// Display-name hint, used when the oracle knows no name.
    pub display_name: Option<String>,
    /// Informational; initials are always derived from the display name.
    pub initials: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// `GET /ws/rooms/:slug`
pub(super) async fn room_upgrade(
    State(state): State<Arc<GatewayState>>,
    Path(slug): Path<String>,
    Query(params): Query<ConnectParams>,
    headers: HeaderMap,
    jar: CookieJar,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Result<Response, UpgradeError> {
    let result = authorize_upgrade(&state, &slug, params, &headers, &jar, ws).await;
    if let Err(err) = &result {
        info!(
            slug = %slug,
            status = err.status().as_u16(),
            reason = err.error_code(),
            "connection refused"
        );
    }
    result
}

async fn authorize_upgrade(
    state: &GatewayState,
    slug: &str,
    params: ConnectParams,
    headers: &HeaderMap,
    jar: &CookieJar,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Result<Response, UpgradeError> {
    let ws = ws.map_err(|rejection| {
        debug!(error = %rejection, "not a websocket upgrade");
        UpgradeError::NotUpgrade
    })?;

    let origin = headers.get(ORIGIN).and_then(|v| v.to_str().ok());
    if !state.websocket.origin_allowed(origin) {
        return Err(UpgradeError::OriginNotAllowed(
            origin.unwrap_or_default().to_string(),
        ));
    }

    let caller = non_empty(
        jar.get(&state.auth.cookie_name)
            .map(|cookie| cookie.value().to_string()),
    )
    .or_else(|| {
        state
            .auth
            .allow_query_identity
            .then(|| non_empty(params.user_id.clone()))
            .flatten()
    });

    let authorization = state.oracle.resolve(slug, caller.as_deref()).await?;

    let user_id = caller.unwrap_or_default();
    if user_id.is_empty() || authorization.room_id.is_empty() {
        return Err(RoomError::MissingMetadata.into());
    }

    let display_name = non_empty(authorization.display_name)
        .or_else(|| non_empty(params.display_name))
        .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string());

    let metadata = SessionMetadata {
        room_id: authorization.room_id,
        user_id,
        display_name,
    };
    let room = state.rooms.get_or_create(&metadata.room_id);
    let outbound_capacity = state.outbound_capacity;

    Ok(ws
        .max_message_size(state.websocket.max_message_size)
        .on_failed_upgrade(|err| warn!(error = %err, "websocket handshake failed"))
        .on_upgrade(move |socket| connection::serve(socket, room, metadata, outbound_capacity)))
}
