// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (caller identity resolved by middleware)
pub mod public;    // /auth/register, /auth/login
pub mod protected; // /auth/whoami, /todos, /todos/:id
