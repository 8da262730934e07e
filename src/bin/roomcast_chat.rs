//! roomcast-chat - line-oriented terminal participant.
//!
//! Usage: `roomcast-chat <endpoint> <user-id> <group-id> [display-name]`
//!
//! Every stdin line is sent as a message; `/quit` leaves the room and
//! `/dismiss` hides the current status line. The server must have
//! `auth.allow_query_identity` enabled, since no session cookie is sent.

use roomcast_proto::{ChatClient, ClientEvent, ReconnectConfig, SendError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(endpoint), Some(user_id), Some(group_id)) = (args.next(), args.next(), args.next())
    else {
        anyhow::bail!("usage: roomcast-chat <endpoint> <user-id> <group-id> [display-name]");
    };

    let mut config = ReconnectConfig::new(endpoint, user_id.clone(), group_id);
    config.display_name = args.next();

    let (client, mut events) = ChatClient::spawn(config)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(ClientEvent::State(state)) => eprintln!("-- {state:?}"),
                Some(ClientEvent::Status(Some(status))) => eprintln!("-- {status}"),
                Some(ClientEvent::Status(None)) => {}
                Some(ClientEvent::Message { record, .. }) => {
                    let who = if record.author_id == user_id { "you" } else { record.initials.as_str() };
                    println!("[{who}] {}", record.body);
                }
                None => break,
            },
            line = lines.next_line() => match line? {
                Some(line) if line.trim() == "/quit" => break,
                Some(line) if line.trim() == "/dismiss" => client.dismiss().await,
                Some(line) => match client.send(line).await {
                    Ok(()) => {}
                    Err(SendError::Empty) => eprintln!("-- {}", roomcast_proto::EMPTY_BODY),
                    Err(e) => eprintln!("-- not sent: {e}"),
                },
                None => break,
            },
        }
    }

    client.teardown().await;
    Ok(())
}
