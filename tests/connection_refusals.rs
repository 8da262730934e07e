//! Integration tests for upgrade refusals.
//!
//! Every refused attempt answers with a status and a JSON `message`, and
//! never reaches a room.

mod common;

use common::TestServer;
use common::client::{TestClient, Upgrade};

#[tokio::test]
async fn test_plain_request_gets_426() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");

    let (status, body) = server.http_get("/ws/rooms/natal").await.unwrap();
    assert_eq!(status, 426);
    assert!(body.contains("Expected websocket Upgrade header"), "{body}");
}

#[tokio::test]
async fn test_missing_identity_gets_401() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");

    let (status, message) = TestClient::refused(&server.room_url("natal"), Upgrade::default())
        .await
        .unwrap();
    assert_eq!(status, 401);
    assert_eq!(message, "Log in to access the chat");
}

#[tokio::test]
async fn test_unknown_group_gets_404() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");

    let upgrade = Upgrade {
        user: Some("ana"),
        ..Default::default()
    };
    let (status, message) = TestClient::refused(&server.room_url("nowhere"), upgrade)
        .await
        .unwrap();
    assert_eq!(status, 404);
    assert_eq!(message, "Group not found");
}

#[tokio::test]
async fn test_non_member_gets_403_and_no_session() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");

    let mut ana = server.connect("natal", "ana").await.unwrap();
    ana.expect_connected().await.unwrap();

    let upgrade = Upgrade {
        user: Some("dani"),
        ..Default::default()
    };
    let (status, message) = TestClient::refused(&server.room_url("natal"), upgrade)
        .await
        .unwrap();
    assert_eq!(status, 403);
    assert_eq!(message, "You cannot join this chat");

    // Owner of another group is still an outsider here.
    let upgrade = Upgrade {
        user: Some("carla"),
        ..Default::default()
    };
    let (status, _) = TestClient::refused(&server.room_url("natal"), upgrade)
        .await
        .unwrap();
    assert_eq!(status, 403);

    // Only ana receives her own message: no refused caller joined.
    ana.say("so nos").await.unwrap();
    assert_eq!(ana.expect_message().await.unwrap().author_id, "ana");
}

#[tokio::test]
async fn test_foreign_origin_gets_403() {
    let server = TestServer::spawn_with(|config| {
        config.websocket.allow_origins = vec!["https://natal.example".to_string()];
    })
    .await
    .expect("Failed to spawn test server");

    let upgrade = Upgrade {
        user: Some("ana"),
        origin: Some("https://evil.example"),
    };
    let (status, message) = TestClient::refused(&server.room_url("natal"), upgrade)
        .await
        .unwrap();
    assert_eq!(status, 403);
    assert_eq!(message, "Origin not allowed");

    let upgrade = Upgrade {
        user: Some("ana"),
        origin: Some("https://NATAL.example"),
    };
    let mut ana = TestClient::connect_with(&server.room_url("natal"), upgrade)
        .await
        .unwrap();
    ana.expect_connected().await.unwrap();
}

#[tokio::test]
async fn test_query_identity_requires_opt_in() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    let url = format!("{}?userId=ana&groupId=g1", server.room_url("natal"));
    let (status, _) = TestClient::refused(&url, Upgrade::default()).await.unwrap();
    assert_eq!(status, 401);

    let server = TestServer::spawn_with(|config| config.auth.allow_query_identity = true)
        .await
        .expect("Failed to spawn test server");
    let url = format!(
        "{}?userId=ana&groupId=g1&displayName=Nome%20Ignorado",
        server.room_url("natal")
    );
    let mut ana = TestClient::connect(&url, None).await.unwrap();
    ana.expect_connected().await.unwrap();
    ana.say("oi").await.unwrap();
    // The oracle's name wins over the hint.
    assert_eq!(ana.expect_message().await.unwrap().initials, "AS");
}

#[tokio::test]
async fn test_cookie_identity_wins_over_query() {
    let server = TestServer::spawn_with(|config| config.auth.allow_query_identity = true)
        .await
        .expect("Failed to spawn test server");

    let url = format!("{}?userId=dani", server.room_url("natal"));
    let mut ana = TestClient::connect(&url, Some("ana")).await.unwrap();
    ana.expect_connected().await.unwrap();
    ana.say("oi").await.unwrap();
    assert_eq!(ana.expect_message().await.unwrap().author_id, "ana");
}

#[tokio::test]
async fn test_backend_outage_gets_500() {
    let server = TestServer::spawn().await.expect("Failed to spawn test server");
    server.db().pool().close().await;

    let upgrade = Upgrade {
        user: Some("ana"),
        ..Default::default()
    };
    let (status, message) = TestClient::refused(&server.room_url("natal"), upgrade)
        .await
        .unwrap();
    assert_eq!(status, 500);
    assert_eq!(message, "Chat backend unavailable");
}
