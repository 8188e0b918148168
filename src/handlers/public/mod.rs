// handlers/public/mod.rs - Token acquisition endpoints, no identity required
pub mod auth;
