// handlers/protected/mod.rs - Handlers behind `identity_middleware`
//
// Every handler here can rely on an `AuthUser` extension being present.
pub mod auth;
pub mod todos;
