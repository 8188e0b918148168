use async_trait::async_trait;
use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::{extract_bearer_token, AuthError, AuthUser, IdentityResolver};
use crate::config::SecurityConfig;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Username of the token holder
    pub sub: String,
    pub user_id: i64,
    pub exp: i64,
    pub iat: i64,
}

/// Freshly signed token plus its lifetime in seconds
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

/// HS256 token issuer and the default `IdentityResolver`
#[derive(Clone)]
pub struct JwtManager {
    secret: String,
    expiry_hours: u64,
}

impl JwtManager {
    pub fn new(secret: impl Into<String>, expiry_hours: u64) -> Self {
        Self {
            secret: secret.into(),
            expiry_hours,
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(security.jwt_secret.clone(), security.jwt_expiry_hours)
    }

    pub fn issue(&self, user_id: i64, username: &str) -> Result<IssuedToken, AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::NotConfigured);
        }

        let now = Utc::now();
        let lifetime = Duration::hours(self.expiry_hours as i64);
        let claims = Claims {
            sub: username.to_string(),
            user_id,
            exp: (now + lifetime).timestamp(),
            iat: now.timestamp(),
        };

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        let token = encode(&Header::default(), &claims, &encoding_key)
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))?;

        Ok(IssuedToken {
            token,
            expires_in: lifetime.num_seconds(),
        })
    }

    /// Validate signature and expiry, returning the embedded claims
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::NotConfigured);
        }

        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(token_data.claims)
    }
}

#[async_trait]
impl IdentityResolver for JwtManager {
    async fn resolve(&self, headers: &HeaderMap) -> Result<AuthUser, AuthError> {
        let token = extract_bearer_token(headers)?;
        let claims = self.validate(token)?;
        Ok(AuthUser::from(claims))
    }
}
