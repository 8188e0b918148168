// handlers/public/auth/mod.rs - Public authentication handlers

pub mod login;    // POST /auth/login - exchange credentials for a bearer token
pub mod register; // POST /auth/register - create a new account

pub use login::login_post;
pub use register::register_post;

use serde::Deserialize;

/// Body shared by register and login
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}
