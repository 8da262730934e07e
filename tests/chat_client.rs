//! End-to-end tests driving the gateway with the reconnecting chat client.

mod common;

use common::TestServer;
use roomcast_proto::reconnect::STATUS_CONNECTING;
use roomcast_proto::{ChatClient, ClientEvent, ConnectionState, ReconnectConfig, SendError};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

async fn wait_for<F>(events: &mut mpsc::Receiver<ClientEvent>, mut predicate: F) -> ClientEvent
where
    F: FnMut(&ClientEvent) -> bool,
{
    timeout(Duration::from_secs(5), async {
        loop {
            let event = events.recv().await.expect("event stream ended");
            if predicate(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for client event")
}

fn open(event: &ClientEvent) -> bool {
    matches!(event, ClientEvent::State(ConnectionState::Open))
}

#[tokio::test]
async fn test_clients_exchange_rendered_messages() {
    let server = TestServer::spawn_with(|config| config.auth.allow_query_identity = true)
        .await
        .expect("Failed to spawn test server");

    let (ana, mut ana_events) =
        ChatClient::spawn(ReconnectConfig::new(server.http_url(), "ana", "g1")).unwrap();
    let mut bia_config = ReconnectConfig::new(server.http_url(), "bia", "g1");
    bia_config.display_name = Some("Bia Reis".to_string());
    let (bia, mut bia_events) = ChatClient::spawn(bia_config).unwrap();

    assert_eq!(
        wait_for(&mut ana_events, |e| matches!(e, ClientEvent::Status(Some(_)))).await,
        ClientEvent::Status(Some(STATUS_CONNECTING.to_string()))
    );
    wait_for(&mut ana_events, open).await;
    wait_for(&mut bia_events, open).await;

    ana.send("Oi <b>bia</b>").await.unwrap();

    let ClientEvent::Message { record, html } =
        wait_for(&mut bia_events, |e| matches!(e, ClientEvent::Message { .. })).await
    else {
        unreachable!()
    };
    assert_eq!(record.author_id, "ana");
    assert_eq!(record.initials, "AS");
    assert!(html.contains("Oi &lt;b&gt;bia&lt;/b&gt;"), "{html}");

    // The sender sees its own message too.
    let ClientEvent::Message { record: echoed, .. } =
        wait_for(&mut ana_events, |e| matches!(e, ClientEvent::Message { .. })).await
    else {
        unreachable!()
    };
    assert_eq!(echoed.id, record.id);

    assert_eq!(bia.send("   ").await, Err(SendError::Empty));

    ana.teardown().await;
    bia.teardown().await;
}

#[tokio::test]
async fn test_refused_client_keeps_retrying() {
    let server = TestServer::spawn_with(|config| config.auth.allow_query_identity = true)
        .await
        .expect("Failed to spawn test server");

    let mut config = ReconnectConfig::new(server.http_url(), "dani", "g1");
    config.retry_delay = Duration::from_millis(50);
    let (client, mut events) = ChatClient::spawn(config).unwrap();

    // Refused twice: connecting, broken, connecting again.
    wait_for(&mut events, |e| {
        matches!(e, ClientEvent::State(ConnectionState::Broken))
    })
    .await;
    wait_for(&mut events, |e| {
        matches!(e, ClientEvent::State(ConnectionState::Connecting))
    })
    .await;

    let result = client.send("Oi").await;
    assert_eq!(
        result,
        Err(SendError::Unavailable {
            unsent: "Oi".to_string()
        })
    );

    client.teardown().await;
}
