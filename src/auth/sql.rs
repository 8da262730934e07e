//! Authorization backed by the group tables.
//!
//! A caller may join a group's room when they own the group or are listed as
//! one of its participants. The room identity is the group id.

use super::{Authorization, AuthorizationOracle, Denial};
use crate::db::{Database, DbError};
use async_trait::async_trait;
use tracing::warn;

/// Oracle reading `groups`, `group_members` and `users`.
#[derive(Clone)]
pub struct SqlOracle {
    db: Database,
}

impl SqlOracle {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn unavailable(err: DbError) -> Denial {
    warn!(error = %err, "authorization lookup failed");
    Denial::Unavailable(err.to_string())
}

#[async_trait]
impl AuthorizationOracle for SqlOracle {
    async fn resolve(&self, slug: &str, caller: Option<&str>) -> Result<Authorization, Denial> {
        let Some(user_id) = caller.filter(|c| !c.is_empty()) else {
            return Err(Denial::Unauthenticated);
        };

        let groups = self.db.groups();
        let group = groups
            .find_by_slug(slug)
            .await
            .map_err(unavailable)?
            .ok_or(Denial::NotFound)?;

        let allowed = group.owner_id == user_id
            || groups
                .is_member(&group.id, user_id)
                .await
                .map_err(unavailable)?;
        if !allowed {
            return Err(Denial::Forbidden);
        }

        let display_name = groups
            .find_user(user_id)
            .await
            .map_err(unavailable)?
            .and_then(|user| user.name.or(user.email))
            .filter(|name| !name.trim().is_empty());

        Ok(Authorization {
            room_id: group.id.into(),
            display_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::seeded;

    async fn oracle() -> SqlOracle {
        SqlOracle::new(seeded().await)
    }

    #[tokio::test]
    async fn missing_identity_is_unauthenticated() {
        let oracle = oracle().await;
        assert_eq!(oracle.resolve("natal", None).await, Err(Denial::Unauthenticated));
        assert_eq!(oracle.resolve("natal", Some("")).await, Err(Denial::Unauthenticated));
    }

    #[tokio::test]
    async fn unknown_slug_is_not_found() {
        let oracle = oracle().await;
        assert_eq!(oracle.resolve("pascoa", Some("ana")).await, Err(Denial::NotFound));
    }

    #[tokio::test]
    async fn outsiders_are_forbidden() {
        let oracle = oracle().await;
        assert_eq!(oracle.resolve("natal", Some("carla")).await, Err(Denial::Forbidden));
    }

    #[tokio::test]
    async fn owner_and_members_are_authorized() {
        let oracle = oracle().await;

        let owner = oracle.resolve("natal", Some("owner")).await.unwrap();
        assert_eq!(owner.room_id.as_str(), "g1");
        assert_eq!(owner.display_name.as_deref(), Some("Olga Dono"));

        let ana = oracle.resolve("natal", Some("ana")).await.unwrap();
        assert_eq!(ana.display_name.as_deref(), Some("Ana Souza"));
    }

    #[tokio::test]
    async fn display_name_falls_back_to_email_then_nothing() {
        let oracle = oracle().await;
        let bia = oracle.resolve("natal", Some("bia")).await.unwrap();
        assert_eq!(bia.display_name.as_deref(), Some("bia@example.com"));

        let nobody = oracle.resolve("natal", Some("nobody")).await.unwrap();
        assert_eq!(nobody.display_name, None);
    }

    #[tokio::test]
    async fn closed_pool_is_unavailable() {
        let db = seeded().await;
        db.pool().close().await;
        let oracle = SqlOracle::new(db);
        assert!(matches!(
            oracle.resolve("natal", Some("ana")).await,
            Err(Denial::Unavailable(_))
        ));
    }
}
