//! Sans-IO reconnection state machine for a chat participant.
//!
//! The [`Reconnector`] performs no I/O and owns no timers. Callers feed it
//! transport events and user commands; it answers with [`Action`]s to carry
//! out (open a socket, arm a timer, show a status line, render a message).
//!
//! ```text
//!   idle ──connect()──▶ connecting ──opened──▶ open
//!                          ▲    │                │
//!            timer_fired() │    └──lost──┐ ┌─lost┘
//!                          │             ▼ ▼
//!                          └────────── broken
//!
//!   any state ──teardown()──▶ closed (terminal)
//! ```
//!
//! At most one retry timer is outstanding. Every timer carries a
//! [`TimerToken`]; a firing whose token is no longer current is ignored, so a
//! single transport failure can never produce two reconnect attempts.
//!
//! # Example
//!
//! ```
//! use roomcast_proto::reconnect::{Action, ConnectionState, ReconnectConfig, Reconnector};
//!
//! let config = ReconnectConfig::new("https://chat.example/ws/rooms/natal", "u1", "g1");
//! let mut machine = Reconnector::new(config).unwrap();
//!
//! let actions = machine.connect();
//! assert!(actions.iter().any(|a| matches!(a, Action::Open { .. })));
//!
//! machine.transport_opened();
//! assert_eq!(machine.state(), ConnectionState::Open);
//! ```

use std::time::Duration;

use url::Url;

use crate::error::{ProtocolError, Result, SendError};
use crate::frame::{ClientFrame, MessageRecord, ServerFrame};

/// Fixed delay between a transport failure and the next connect attempt.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(2000);

/// Status shown while a connect attempt is in flight.
pub const STATUS_CONNECTING: &str = "Connecting to chat...";

/// Status shown after an unexpected transport loss.
pub const STATUS_RECONNECTING: &str = "Connection lost. Reconnecting...";

/// Status shown when the user tries to send while not connected.
pub const STATUS_UNAVAILABLE: &str =
    "Connection unavailable. Wait for the reconnection to send messages.";

/// Current connection state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Created, `connect()` not called yet.
    #[default]
    Idle,
    /// Transport requested, not open yet.
    Connecting,
    /// Transport open; messages may be sent.
    Open,
    /// Transport lost; a retry timer is armed.
    Broken,
    /// Torn down on purpose. Terminal.
    Closed,
}

/// What the participant wants the connection to be.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Desired {
    /// Keep (re)connecting.
    Connected,
    /// Stay down; no more retries.
    Disconnected,
}

/// Identifies one armed retry timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// Side effects requested by the state machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Open a transport to this URL.
    Open {
        /// WebSocket URL including connection parameters.
        url: String,
    },
    /// Close the current transport, if any.
    Close,
    /// Arm the retry timer. Replaces any previously armed timer.
    ArmTimer {
        /// Token to hand back through [`Reconnector::timer_fired`].
        token: TimerToken,
        /// Delay before firing.
        delay: Duration,
    },
    /// Drop the timer identified by `token`.
    CancelTimer {
        /// Token of the timer to cancel.
        token: TimerToken,
    },
    /// Show a transient status line.
    ShowStatus(String),
    /// Hide the status line.
    ClearStatus,
    /// Append a confirmed message to the log and scroll to it.
    Render(MessageRecord),
}

/// Connection parameters for one participant.
#[derive(Clone, Debug)]
pub struct ReconnectConfig {
    /// Chat endpoint; `http(s)` is mapped to `ws(s)`.
    pub endpoint: String,
    /// Caller identity.
    pub user_id: String,
    /// Group the room belongs to.
    pub group_id: String,
    /// Display-name hint for the coordinator.
    pub display_name: Option<String>,
    /// Initials hint for the coordinator.
    pub initials: Option<String>,
    /// Delay between a failure and the next attempt.
    pub retry_delay: Duration,
}

impl ReconnectConfig {
    /// Configuration with the default retry delay and no hints.
    pub fn new(
        endpoint: impl Into<String>,
        user_id: impl Into<String>,
        group_id: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            user_id: user_id.into(),
            group_id: group_id.into(),
            display_name: None,
            initials: None,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Build the WebSocket URL carrying identity and hints as query parameters.
    pub fn socket_url(&self) -> Result<String> {
        let invalid = |reason: &str| ProtocolError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            reason: reason.to_string(),
        };

        let mut url = Url::parse(&self.endpoint).map_err(|e| invalid(&e.to_string()))?;
        let scheme = match url.scheme() {
            "https" | "wss" => "wss",
            "http" | "ws" => "ws",
            _ => return Err(invalid("unsupported scheme")),
        };
        url.set_scheme(scheme)
            .map_err(|()| invalid("unsupported scheme"))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("userId", &self.user_id);
            query.append_pair("groupId", &self.group_id);
            if let Some(name) = self.display_name.as_deref().filter(|n| !n.is_empty()) {
                query.append_pair("displayName", name);
            }
            if let Some(initials) = self.initials.as_deref().filter(|i| !i.is_empty()) {
                query.append_pair("initials", initials);
            }
        }

        Ok(url.into())
    }
}

/// Participant-side connection state machine.
#[derive(Debug)]
pub struct Reconnector {
    url: String,
    user_id: String,
    retry_delay: Duration,
    state: ConnectionState,
    desired: Desired,
    timer: Option<TimerToken>,
    next_token: u64,
    status: Option<String>,
    server_session: Option<String>,
    attempts: u64,
}

impl Reconnector {
    /// Create a machine in the `idle` state.
    pub fn new(config: ReconnectConfig) -> Result<Self> {
        Ok(Self {
            url: config.socket_url()?,
            user_id: config.user_id,
            retry_delay: config.retry_delay,
            state: ConnectionState::Idle,
            desired: Desired::Connected,
            timer: None,
            next_token: 0,
            status: None,
            server_session: None,
            attempts: 0,
        })
    }

    /// Current state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Desired state.
    pub fn desired(&self) -> Desired {
        self.desired
    }

    /// Status line currently shown, if any.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Token of the armed retry timer, if any.
    pub fn pending_timer(&self) -> Option<TimerToken> {
        self.timer
    }

    /// Number of connect attempts made so far.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Session id announced by the coordinator on the current connection.
    pub fn server_session(&self) -> Option<&str> {
        self.server_session.as_deref()
    }

    /// The participant this machine connects as.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The WebSocket URL used for every attempt.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// `idle → connecting`. No-op in every other state.
    pub fn connect(&mut self) -> Vec<Action> {
        if self.state != ConnectionState::Idle {
            return Vec::new();
        }
        self.begin_attempt()
    }

    /// `connecting → open`.
    pub fn transport_opened(&mut self) -> Vec<Action> {
        match self.state {
            ConnectionState::Connecting => {
                self.state = ConnectionState::Open;
                self.clear_status().into_iter().collect()
            }
            // Torn down while the attempt was in flight.
            ConnectionState::Closed => vec![Action::Close],
            _ => Vec::new(),
        }
    }

    /// Handle one text frame received while open.
    pub fn frame_received(&mut self, raw: &str) -> Result<Vec<Action>> {
        if self.state != ConnectionState::Open {
            return Ok(Vec::new());
        }

        let actions = match ServerFrame::decode(raw)? {
            ServerFrame::Message { payload } => vec![Action::Render(payload)],
            ServerFrame::Error { message } => vec![self.show_status(message)],
            ServerFrame::System { id, .. } => {
                self.server_session = Some(id);
                Vec::new()
            }
            ServerFrame::Pong { .. } => Vec::new(),
        };
        Ok(actions)
    }

    /// Transport closed or errored without a manual teardown:
    /// `open | connecting → broken` and arm the retry timer.
    pub fn transport_lost(&mut self) -> Vec<Action> {
        if self.desired == Desired::Disconnected
            || !matches!(
                self.state,
                ConnectionState::Open | ConnectionState::Connecting
            )
        {
            return Vec::new();
        }

        self.state = ConnectionState::Broken;
        self.server_session = None;

        let mut actions = vec![self.show_status(STATUS_RECONNECTING)];
        if let Some(token) = self.timer.take() {
            actions.push(Action::CancelTimer { token });
        }
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        self.timer = Some(token);
        actions.push(Action::ArmTimer {
            token,
            delay: self.retry_delay,
        });
        actions
    }

    /// Retry timer fired: `broken → connecting`. Stale tokens are ignored.
    pub fn timer_fired(&mut self, token: TimerToken) -> Vec<Action> {
        if self.timer != Some(token) {
            return Vec::new();
        }
        self.timer = None;
        if self.state != ConnectionState::Broken || self.desired == Desired::Disconnected {
            return Vec::new();
        }
        self.begin_attempt()
    }

    /// Any state → `closed`. Cancels the timer and closes the transport.
    pub fn teardown(&mut self) -> Vec<Action> {
        if self.state == ConnectionState::Closed {
            return Vec::new();
        }

        let mut actions = Vec::new();
        if let Some(token) = self.timer.take() {
            actions.push(Action::CancelTimer { token });
        }
        if matches!(
            self.state,
            ConnectionState::Open | ConnectionState::Connecting
        ) {
            actions.push(Action::Close);
        }
        self.desired = Desired::Disconnected;
        self.state = ConnectionState::Closed;
        actions
    }

    /// Encode a user message for transmission.
    ///
    /// Only succeeds while open. Otherwise the unavailable status is shown
    /// and the input is handed back in the error.
    pub fn send(&mut self, input: &str) -> std::result::Result<String, SendError> {
        let body = input.trim();
        if body.is_empty() {
            return Err(SendError::Empty);
        }
        if self.state != ConnectionState::Open {
            self.status = Some(STATUS_UNAVAILABLE.to_string());
            return Err(SendError::Unavailable {
                unsent: input.to_string(),
            });
        }
        ClientFrame::message(body)
            .encode()
            .map_err(|_| SendError::Unavailable {
                unsent: input.to_string(),
            })
    }

    /// Dismiss the status line.
    pub fn dismiss_status(&mut self) -> Vec<Action> {
        self.clear_status().into_iter().collect()
    }

    fn begin_attempt(&mut self) -> Vec<Action> {
        self.state = ConnectionState::Connecting;
        self.attempts += 1;
        vec![
            self.show_status(STATUS_CONNECTING),
            Action::Open {
                url: self.url.clone(),
            },
        ]
    }

    fn show_status(&mut self, text: impl Into<String>) -> Action {
        let text = text.into();
        self.status = Some(text.clone());
        Action::ShowStatus(text)
    }

    fn clear_status(&mut self) -> Option<Action> {
        self.status.take().map(|_| Action::ClearStatus)
    }
}
