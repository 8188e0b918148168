use async_trait::async_trait;
use axum::http::HeaderMap;
use sqlx::SqlitePool;
use std::path::PathBuf;

use crate::auth::{AuthError, AuthUser, IdentityResolver};
use crate::config::DatabaseConfig;
use crate::database::{DatabaseManager, UserRepository};
use crate::services::TodoService;

/// Test utilities: a private store with a todo service on top
pub struct TestContext {
    pub pool: SqlitePool,
    pub todos: TodoService,
    db_file: Option<PathBuf>,
}

impl TestContext {
    /// In-memory store behind a single connection
    pub async fn new() -> anyhow::Result<Self> {
        Self::open(DatabaseConfig::in_memory(), None).await
    }

    /// Temporary database file behind a pool of `connections`, removed on drop
    pub async fn on_disk(connections: u32) -> anyhow::Result<Self> {
        let path = std::env::temp_dir().join(format!("todo-api-test-{}.db", uuid::Uuid::new_v4().simple()));
        let config = DatabaseConfig {
            url: format!("sqlite://{}", path.display()),
            max_connections: connections,
            connection_timeout: 10,
        };
        Self::open(config, Some(path)).await
    }

    async fn open(config: DatabaseConfig, db_file: Option<PathBuf>) -> anyhow::Result<Self> {
        let pool = DatabaseManager::connect(&config)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to open test database {}: {}", config.url, e))?;

        Ok(Self {
            todos: TodoService::new(pool.clone()),
            pool,
            db_file,
        })
    }

    /// Insert a user row and return the identity a resolver would produce for it
    pub async fn user(&self, username: &str) -> anyhow::Result<AuthUser> {
        let mut conn = self.pool.acquire().await?;
        let user = UserRepository::insert(&mut conn, username, "unused$hash").await?;
        Ok(AuthUser {
            user_id: user.id,
            username: user.username,
        })
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        if let Some(path) = &self.db_file {
            for suffix in ["", "-wal", "-shm"] {
                let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
            }
        }
    }
}

/// Resolver double that always yields the same identity, or always refuses
pub struct FixedIdentity(pub Option<AuthUser>);

#[async_trait]
impl IdentityResolver for FixedIdentity {
    async fn resolve(&self, _headers: &HeaderMap) -> Result<AuthUser, AuthError> {
        self.0.clone().ok_or(AuthError::MissingToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_users_get_distinct_ids() {
        let ctx = TestContext::new().await.unwrap();
        let a = ctx.user("alice").await.unwrap();
        let b = ctx.user("bob").await.unwrap();
        assert_ne!(a.user_id, b.user_id);
    }

    #[tokio::test]
    async fn fixed_identity_ignores_headers() {
        let who = AuthUser { user_id: 5, username: "fixed".to_string() };
        let resolver = FixedIdentity(Some(who.clone()));
        assert_eq!(resolver.resolve(&HeaderMap::new()).await.unwrap(), who);

        let refusing = FixedIdentity(None);
        assert!(refusing.resolve(&HeaderMap::new()).await.is_err());
    }
}
