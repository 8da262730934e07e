//! Test server management.
//!
//! Runs the gateway inside the test's runtime on an ephemeral port, backed
//! by a SQLite file in a temporary directory.
//!
//! Seeded fixture:
//! - group `natal` (id `g1`) owned by `owner`, members `ana` and `bia`
//! - group `praia` (id `g2`) owned by `carla`, no members
//! - `bia` has an email but no name; `dani` belongs to no group

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use roomcast::bind_gateway;
use roomcast::config::Config;
use roomcast::db::Database;
use roomcast::network::{Gateway, GatewayState};
use std::net::SocketAddr;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tower::ServiceExt;

/// A test server instance.
pub struct TestServer {
    addr: SocketAddr,
    db: Database,
    state: Arc<GatewayState>,
    task: JoinHandle<anyhow::Result<()>>,
    _data_dir: TempDir,
}

impl TestServer {
    /// Spawn a server with the default configuration.
    pub async fn spawn() -> anyhow::Result<Self> {
        Self::spawn_with(|_| {}).await
    }

    /// Spawn a server after letting the caller adjust the configuration.
    pub async fn spawn_with(customize: impl FnOnce(&mut Config)) -> anyhow::Result<Self> {
        let data_dir = tempfile::tempdir()?;
        let db_path = data_dir.path().join("roomcast.db");

        let mut config: Config = toml::from_str(&format!(
            r#"
[server]
name = "test.roomcast"

[listen]
address = "127.0.0.1:0"

[database]
path = '{}'
"#,
            db_path.display()
        ))?;
        customize(&mut config);

        roomcast::metrics::init();

        let db = Database::new(&config.database.path).await?;
        seed(&db).await?;

        let gateway = bind_gateway(&config, db.clone()).await?;
        let addr = gateway.local_addr()?;
        let state = gateway.state();
        let task = tokio::spawn(gateway.run(std::future::pending()));

        Ok(Self {
            addr,
            db,
            state,
            task,
            _data_dir: data_dir,
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// WebSocket URL of a group's chat room.
    pub fn room_url(&self, slug: &str) -> String {
        format!("ws://{}/ws/rooms/{}", self.addr, slug)
    }

    /// Plain HTTP base URL, as a browser page would know it.
    pub fn http_url(&self) -> String {
        format!("http://{}/ws/rooms/natal", self.addr)
    }

    /// Direct access to the backing database.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Connect a participant to a room as `user`.
    pub async fn connect(&self, slug: &str, user: &str) -> anyhow::Result<super::TestClient> {
        super::TestClient::connect(&self.room_url(slug), Some(user)).await
    }

    /// Make the message table unwritable until [`Self::restore_messages`].
    pub async fn break_messages(&self) -> anyhow::Result<()> {
        sqlx::query("ALTER TABLE messages RENAME TO messages_offline")
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    pub async fn restore_messages(&self) -> anyhow::Result<()> {
        sqlx::query("ALTER TABLE messages_offline RENAME TO messages")
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    /// Stored bodies of a group, oldest first.
    pub async fn stored_bodies(&self, group_id: &str) -> anyhow::Result<Vec<String>> {
        let bodies = sqlx::query_scalar::<_, String>(
            "SELECT body FROM messages WHERE group_id = ? ORDER BY rowid",
        )
        .bind(group_id)
        .fetch_all(self.db.pool())
        .await?;
        Ok(bodies)
    }

    /// The router the listener serves, sharing this server's rooms.
    pub fn router(&self) -> Router {
        Gateway::router(self.state.clone())
    }

    /// Issue a plain GET against the router and return the status and body.
    pub async fn http_get(&self, path: &str) -> anyhow::Result<(u16, String)> {
        let request = Request::builder().uri(path).body(Body::empty())?;
        let response = self.router().oneshot(request).await?;
        let status = response.status().as_u16();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        Ok((status, String::from_utf8(body.to_vec())?))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn seed(db: &Database) -> anyhow::Result<()> {
    for (id, name, email) in [
        ("owner", Some("Olga Dono"), Some("olga@example.com")),
        ("ana", Some("Ana Souza"), None),
        ("bia", None, Some("bia@example.com")),
        ("carla", Some("Carla Lima"), None),
        ("dani", Some("Dani"), None),
    ] {
        sqlx::query("INSERT INTO users (id, name, email) VALUES (?, ?, ?)")
            .bind(id)
            .bind(name)
            .bind(email)
            .execute(db.pool())
            .await?;
    }
    for (id, slug, owner) in [("g1", "natal", "owner"), ("g2", "praia", "carla")] {
        sqlx::query("INSERT INTO groups (id, slug, name, owner_id) VALUES (?, ?, ?, ?)")
            .bind(id)
            .bind(slug)
            .bind(slug)
            .bind(owner)
            .execute(db.pool())
            .await?;
    }
    for member in ["ana", "bia"] {
        sqlx::query("INSERT INTO group_members (group_id, user_id) VALUES ('g1', ?)")
            .bind(member)
            .execute(db.pool())
            .await?;
    }
    Ok(())
}
