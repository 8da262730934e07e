//! Tokio driver for the [`Reconnector`] state machine.
//!
//! [`ChatClient::spawn`] starts a background task that owns the WebSocket and
//! the retry timer, executes the machine's [`Action`]s and reports what a
//! participant should see through a stream of [`ClientEvent`]s.
//!
//! The driver never waits on the event stream. Events the participant has not
//! collected yet are kept in order in a backlog and handed over as the
//! receiver frees capacity, so a caller blocked in [`ChatClient::send`] can
//! never stall the connection.

use std::collections::VecDeque;
use std::future::{pending, Future};
use std::pin::Pin;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Sleep};
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::error::{Result, SendError};
use crate::frame::MessageRecord;
use crate::reconnect::{Action, ConnectionState, ReconnectConfig, Reconnector, TimerToken};
use crate::render::render_message_bubble;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type ConnectFuture = Pin<Box<dyn Future<Output = std::result::Result<WsStream, WsError>> + Send>>;

const EVENT_BUFFER: usize = 64;

/// Something the participant's view should reflect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// The connection moved to a new state.
    State(ConnectionState),
    /// Status line changed; `None` hides it.
    Status(Option<String>),
    /// A confirmed message to append to the log.
    Message {
        /// The message as received.
        record: MessageRecord,
        /// Bubble markup from the viewer's perspective.
        html: String,
    },
}

enum Command {
    Send {
        body: String,
        reply: oneshot::Sender<std::result::Result<(), SendError>>,
    },
    Dismiss,
    Teardown,
}

/// Handle to a running chat connection.
///
/// Dropping the handle tears the connection down.
pub struct ChatClient {
    commands: mpsc::Sender<Command>,
    task: JoinHandle<()>,
}

impl ChatClient {
    /// Start connecting in the background.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(config: ReconnectConfig) -> Result<(Self, mpsc::Receiver<ClientEvent>)> {
        let machine = Reconnector::new(config)?;
        let (commands, command_rx) = mpsc::channel(16);
        let (events, event_rx) = mpsc::channel(EVENT_BUFFER);

        let driver = Driver {
            last_state: machine.state(),
            machine,
            events,
            backlog: VecDeque::new(),
            connecting: None,
            socket: None,
            timer: None,
        };
        let task = tokio::spawn(driver.run(command_rx));

        Ok((Self { commands, task }, event_rx))
    }

    /// Send a message. Fails unless the connection is open.
    pub async fn send(&self, body: impl Into<String>) -> std::result::Result<(), SendError> {
        let body = body.into();
        let (reply, reply_rx) = oneshot::channel();
        let command = Command::Send {
            body: body.clone(),
            reply,
        };
        if self.commands.send(command).await.is_err() {
            return Err(SendError::Unavailable { unsent: body });
        }
        reply_rx
            .await
            .unwrap_or(Err(SendError::Unavailable { unsent: body }))
    }

    /// Hide the current status line.
    pub async fn dismiss(&self) {
        let _ = self.commands.send(Command::Dismiss).await;
    }

    /// Close the connection and stop retrying. Waits for the driver to exit.
    pub async fn teardown(self) {
        let _ = self.commands.send(Command::Teardown).await;
        if let Err(e) = self.task.await {
            warn!(error = %e, "chat driver task failed");
        }
    }
}

struct Driver {
    machine: Reconnector,
    last_state: ConnectionState,
    events: mpsc::Sender<ClientEvent>,
    backlog: VecDeque<ClientEvent>,
    connecting: Option<ConnectFuture>,
    socket: Option<WsStream>,
    timer: Option<(TimerToken, Pin<Box<Sleep>>)>,
}

impl Driver {
    async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        let actions = self.machine.connect();
        self.apply(actions).await;

        loop {
            let events = self.events.clone();
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Send { body, reply }) => {
                        let result = self.send(&body).await;
                        let _ = reply.send(result);
                    }
                    Some(Command::Dismiss) => {
                        let actions = self.machine.dismiss_status();
                        self.apply(actions).await;
                    }
                    Some(Command::Teardown) | None => {
                        let actions = self.machine.teardown();
                        self.apply(actions).await;
                        break;
                    }
                },
                result = next_connect(&mut self.connecting) => {
                    self.connecting = None;
                    let actions = match result {
                        Ok(stream) => {
                            info!(url = %self.machine.url(), "chat connected");
                            self.socket = Some(stream);
                            self.machine.transport_opened()
                        }
                        Err(e) => {
                            warn!(url = %self.machine.url(), error = %e, "chat connect failed");
                            self.machine.transport_lost()
                        }
                    };
                    self.apply(actions).await;
                }
                frame = next_frame(&mut self.socket) => {
                    let actions = match frame {
                        Some(Ok(Message::Text(text))) => match self.machine.frame_received(&text) {
                            Ok(actions) => actions,
                            Err(e) => {
                                debug!(error = %e, "ignoring undecodable frame");
                                Vec::new()
                            }
                        },
                        Some(Ok(Message::Close(_))) | None => {
                            info!("chat connection closed by peer");
                            self.socket = None;
                            self.machine.transport_lost()
                        }
                        Some(Ok(_)) => Vec::new(),
                        Some(Err(e)) => {
                            warn!(error = %e, "chat connection failed");
                            self.socket = None;
                            self.machine.transport_lost()
                        }
                    };
                    self.apply(actions).await;
                }
                token = next_timer(&mut self.timer) => {
                    self.timer = None;
                    let actions = self.machine.timer_fired(token);
                    self.apply(actions).await;
                }
                permit = events.reserve(), if !self.backlog.is_empty() => match permit {
                    Ok(permit) => {
                        if let Some(event) = self.backlog.pop_front() {
                            permit.send(event);
                        }
                    }
                    // Nobody is listening any more.
                    Err(_) => self.backlog.clear(),
                },
            }
        }

        // Hand over what fits; teardown must not wait on the participant.
        while let Some(event) = self.backlog.pop_front() {
            if self.events.try_send(event).is_err() {
                break;
            }
        }
    }

    async fn send(&mut self, body: &str) -> std::result::Result<(), SendError> {
        let encoded = match self.machine.send(body) {
            Ok(encoded) => encoded,
            Err(e) => {
                if matches!(e, SendError::Unavailable { .. }) {
                    let status = self.machine.status().map(str::to_string);
                    self.emit(ClientEvent::Status(status));
                }
                return Err(e);
            }
        };

        let Some(socket) = self.socket.as_mut() else {
            return Err(SendError::Unavailable {
                unsent: body.to_string(),
            });
        };
        if let Err(e) = socket.send(Message::Text(encoded)).await {
            warn!(error = %e, "chat send failed");
            self.socket = None;
            let actions = self.machine.transport_lost();
            self.apply(actions).await;
            return Err(SendError::Unavailable {
                unsent: body.to_string(),
            });
        }
        Ok(())
    }

    async fn apply(&mut self, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::Open { url } => {
                    debug!(%url, attempt = self.machine.attempts(), "opening chat connection");
                    self.socket = None;
                    self.connecting = Some(Box::pin(async move {
                        connect_async(url).await.map(|(stream, _response)| stream)
                    }));
                }
                Action::Close => {
                    self.connecting = None;
                    if let Some(mut socket) = self.socket.take() {
                        let _ = socket.close(None).await;
                    }
                }
                Action::ArmTimer { token, delay } => {
                    self.timer = Some((token, Box::pin(sleep(delay))));
                }
                Action::CancelTimer { token } => {
                    if self.timer.as_ref().is_some_and(|(armed, _)| *armed == token) {
                        self.timer = None;
                    }
                }
                Action::ShowStatus(text) => self.emit(ClientEvent::Status(Some(text))),
                Action::ClearStatus => self.emit(ClientEvent::Status(None)),
                Action::Render(record) => {
                    let html = render_message_bubble(&record, self.machine.user_id());
                    self.emit(ClientEvent::Message { record, html });
                }
            }
        }

        let state = self.machine.state();
        if state != self.last_state {
            self.last_state = state;
            self.emit(ClientEvent::State(state));
        }
    }

    fn emit(&mut self, event: ClientEvent) {
        if self.events.is_closed() {
            return;
        }
        match self.events.try_reserve() {
            Ok(permit) if self.backlog.is_empty() => permit.send(event),
            _ => self.backlog.push_back(event),
        }
    }
}

async fn next_connect(
    connecting: &mut Option<ConnectFuture>,
) -> std::result::Result<WsStream, WsError> {
    match connecting {
        Some(future) => future.await,
        None => pending().await,
    }
}

async fn next_frame(socket: &mut Option<WsStream>) -> Option<std::result::Result<Message, WsError>> {
    match socket {
        Some(stream) => stream.next().await,
        None => pending().await,
    }
}

async fn next_timer(timer: &mut Option<(TimerToken, Pin<Box<Sleep>>)>) -> TimerToken {
    match timer {
        Some((token, sleep)) => {
            sleep.as_mut().await;
            *token
        }
        None => pending().await,
    }
}
