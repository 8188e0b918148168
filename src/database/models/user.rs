use serde::Serialize;
use sqlx::FromRow;

/// Account row backing the bearer-token identity resolver
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: String,
}
