use serde::Serialize;
use sqlx::SqlitePool;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::auth::password::{hash_password, verify_password, PasswordHashError};
use crate::auth::{AuthError, JwtManager};
use crate::database::models::User;
use crate::database::UserRepository;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("{message}")]
    Validation { field: &'static str, message: String },

    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Password hashing failed: {0}")]
    Hashing(#[from] PasswordHashError),

    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: User,
}

/// Account registration and password login for the bearer-token resolver
#[derive(Clone)]
pub struct UserService {
    pool: SqlitePool,
    tokens: Arc<JwtManager>,
}

impl UserService {
    pub fn new(pool: SqlitePool, tokens: Arc<JwtManager>) -> Self {
        Self { pool, tokens }
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<User, UserError> {
        let username = validate_username(username)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(UserError::Validation {
                field: "password",
                message: format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
            });
        }

        let password_hash = hash_password(password)?;

        let mut conn = self.pool.acquire().await?;
        let user = UserRepository::insert(&mut conn, username, &password_hash)
            .await
            .map_err(|e| match e.as_database_error() {
                Some(db) if db.is_unique_violation() => UserError::UsernameTaken(username.to_string()),
                _ => UserError::Store(e),
            })?;

        info!("Registered user '{}' ({})", user.username, user.id);
        Ok(user)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, UserError> {
        let mut conn = self.pool.acquire().await?;
        let user = UserRepository::find_by_username(&mut conn, username.trim())
            .await?
            .filter(|user| verify_password(password, &user.password_hash))
            .ok_or(AuthError::InvalidCredentials)?;
        drop(conn);

        let issued = self.tokens.issue(user.id, &user.username)?;
        debug!("Issued token for user '{}'", user.username);

        Ok(LoginResponse {
            token: issued.token,
            token_type: "Bearer",
            expires_in: issued.expires_in,
            user,
        })
    }
}

fn validate_username(username: &str) -> Result<&str, UserError> {
    let username = username.trim();
    let valid_chars = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));

    if !(3..=64).contains(&username.len()) || !valid_chars {
        return Err(UserError::Validation {
            field: "username",
            message: "Username must be 3-64 characters of letters, digits, '_', '.' or '-'".to_string(),
        });
    }
    Ok(username)
}
