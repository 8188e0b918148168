pub mod todo;
pub mod user;

pub use todo::{InvalidPriority, Priority, Todo, TodoInput};
pub use user::User;
