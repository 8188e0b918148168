pub mod todo_service;
pub mod user_service;

pub use todo_service::{TodoError, TodoService};
pub use user_service::{LoginResponse, UserError, UserService};
