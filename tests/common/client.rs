//! Test chat participant.
//!
//! Speaks the JSON frame protocol over a raw tokio-tungstenite socket so
//! tests can send malformed payloads a real client never would.

use futures_util::{SinkExt, StreamExt};
use roomcast_proto::{MessageRecord, ServerFrame};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::{COOKIE, ORIGIN};
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Optional request decorations for an upgrade attempt.
#[derive(Debug, Default, Clone)]
pub struct Upgrade<'a> {
    /// Sent as the `session` cookie.
    pub user: Option<&'a str>,
    pub origin: Option<&'a str>,
}

/// A connected test participant.
pub struct TestClient {
    ws: WsStream,
    session_id: Option<String>,
}

impl TestClient {
    /// Connect to a room URL, sending `user` as the session cookie.
    pub async fn connect(url: &str, user: Option<&str>) -> anyhow::Result<Self> {
        Self::connect_with(
            url,
            Upgrade {
                user,
                ..Default::default()
            },
        )
        .await
    }

    pub async fn connect_with(url: &str, upgrade: Upgrade<'_>) -> anyhow::Result<Self> {
        let (ws, _response) = connect_async(request(url, &upgrade)?).await?;
        Ok(Self {
            ws,
            session_id: None,
        })
    }

    /// Attempt an upgrade that the gateway is expected to refuse.
    ///
    /// Returns the HTTP status and the `message` field of the JSON body.
    pub async fn refused(url: &str, upgrade: Upgrade<'_>) -> anyhow::Result<(u16, String)> {
        match connect_async(request(url, &upgrade)?).await {
            Ok(_) => anyhow::bail!("upgrade to {url} unexpectedly succeeded"),
            Err(WsError::Http(response)) => {
                let status = response.status().as_u16();
                let body = response.body().clone().unwrap_or_default();
                let json: serde_json::Value = serde_json::from_slice(&body)?;
                let message = json["message"].as_str().unwrap_or_default().to_string();
                Ok((status, message))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Session id announced by the room, once [`Self::expect_connected`] ran.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Send a raw text frame.
    pub async fn send_raw(&mut self, text: &str) -> anyhow::Result<()> {
        self.ws.send(Message::Text(text.to_string())).await?;
        Ok(())
    }

    /// Send a chat message frame.
    pub async fn say(&mut self, body: &str) -> anyhow::Result<()> {
        let frame = serde_json::json!({ "type": "message", "body": body });
        self.send_raw(&frame.to_string()).await
    }

    pub async fn send_binary(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        self.ws.send(Message::Binary(bytes.to_vec())).await?;
        Ok(())
    }

    /// Receive the next server frame.
    pub async fn recv(&mut self) -> anyhow::Result<ServerFrame> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive the next server frame, skipping transport-level control frames.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<ServerFrame> {
        loop {
            let next = timeout(dur, self.ws.next())
                .await?
                .ok_or_else(|| anyhow::anyhow!("socket closed"))??;
            match next {
                Message::Text(text) => return Ok(ServerFrame::decode(&text)?),
                Message::Close(frame) => anyhow::bail!("socket closed: {frame:?}"),
                _ => continue,
            }
        }
    }

    /// Expect the accept notice and remember the session id.
    pub async fn expect_connected(&mut self) -> anyhow::Result<String> {
        match self.recv().await? {
            ServerFrame::System { message, id } if message == "connected" => {
                self.session_id = Some(id.clone());
                Ok(id)
            }
            other => anyhow::bail!("expected connected notice, got {other:?}"),
        }
    }

    /// Expect a confirmed message.
    pub async fn expect_message(&mut self) -> anyhow::Result<MessageRecord> {
        match self.recv().await? {
            ServerFrame::Message { payload } => Ok(payload),
            other => anyhow::bail!("expected message, got {other:?}"),
        }
    }

    /// Expect an error frame and return its text.
    pub async fn expect_error(&mut self) -> anyhow::Result<String> {
        match self.recv().await? {
            ServerFrame::Error { message } => Ok(message),
            other => anyhow::bail!("expected error, got {other:?}"),
        }
    }

    /// Assert that nothing arrives within `dur`.
    pub async fn expect_silence(&mut self, dur: Duration) -> anyhow::Result<()> {
        match self.recv_timeout(dur).await {
            Ok(frame) => anyhow::bail!("expected silence, got {frame:?}"),
            Err(_) => Ok(()),
        }
    }

    /// Close the connection and wait for the server's close reply.
    pub async fn close(mut self) -> anyhow::Result<()> {
        self.ws.close(None).await?;
        while let Ok(Some(Ok(_))) = timeout(Duration::from_secs(2), self.ws.next()).await {}
        Ok(())
    }
}

fn request(
    url: &str,
    upgrade: &Upgrade<'_>,
) -> anyhow::Result<tokio_tungstenite::tungstenite::handshake::client::Request> {
    let mut request = url.into_client_request()?;
    if let Some(user) = upgrade.user {
        request
            .headers_mut()
            .insert(COOKIE, HeaderValue::from_str(&format!("session={user}"))?);
    }
    if let Some(origin) = upgrade.origin {
        request
            .headers_mut()
            .insert(ORIGIN, HeaderValue::from_str(origin)?);
    }
    Ok(request)
}
