//! Integration tests for the `[rooms]` broadcast policies.

mod common;

use common::TestServer;
use std::time::Duration;

const QUIET: Duration = Duration::from_millis(200);

#[tokio::test]
async fn test_echo_off_skips_the_sender() {
    let server = TestServer::spawn_with(|config| config.rooms.echo_sender = false)
        .await
        .expect("Failed to spawn test server");

    let mut ana = server.connect("natal", "ana").await.unwrap();
    let mut bia = server.connect("natal", "bia").await.unwrap();
    ana.expect_connected().await.unwrap();
    bia.expect_connected().await.unwrap();

    ana.say("Oi").await.unwrap();
    assert_eq!(bia.expect_message().await.unwrap().body, "Oi");
    ana.expect_silence(QUIET).await.unwrap();

    // Still persisted.
    assert_eq!(server.stored_bodies("g1").await.unwrap(), vec!["Oi"]);
}

#[tokio::test]
async fn test_persist_off_keeps_messages_ephemeral() {
    let server = TestServer::spawn_with(|config| config.rooms.persist = false)
        .await
        .expect("Failed to spawn test server");

    let mut ana = server.connect("natal", "ana").await.unwrap();
    let mut bia = server.connect("natal", "bia").await.unwrap();
    ana.expect_connected().await.unwrap();
    bia.expect_connected().await.unwrap();

    // A broken table is never touched.
    server.break_messages().await.unwrap();

    ana.say("efemera").await.unwrap();
    assert_eq!(ana.expect_message().await.unwrap().body, "efemera");
    assert_eq!(bia.expect_message().await.unwrap().body, "efemera");

    server.restore_messages().await.unwrap();
    assert!(server.stored_bodies("g1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_announce_off_sends_no_notice() {
    let server = TestServer::spawn_with(|config| config.rooms.announce_session = false)
        .await
        .expect("Failed to spawn test server");

    let mut ana = server.connect("natal", "ana").await.unwrap();
    ana.expect_silence(QUIET).await.unwrap();

    ana.say("Oi").await.unwrap();
    assert_eq!(ana.expect_message().await.unwrap().body, "Oi");
}
