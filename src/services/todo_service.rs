use sqlx::{SqliteConnection, SqlitePool};
use thiserror::Error;
use tracing::debug;

use crate::auth::AuthUser;
use crate::database::models::{Todo, TodoInput};
use crate::database::TodoRepository;

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("{message}")]
    Validation { field: &'static str, message: String },

    #[error("Todo {0} not found")]
    NotFound(i64),

    #[error("Not allowed to modify todo {0}")]
    Forbidden(i64),

    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

/// Owner-scoped CRUD over todos.
///
/// Each call takes one connection from the injected pool for its whole unit of
/// work and hands it back when the guard drops, including on early returns.
/// Writes are single owner-qualified statements in autocommit mode, so they wait
/// on the store's busy timeout instead of holding a read lock while upgrading.
#[derive(Clone)]
pub struct TodoService {
    pool: SqlitePool,
}

impl TodoService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, caller: &AuthUser, input: TodoInput) -> Result<Todo, TodoError> {
        validate(&input)?;

        let mut conn = self.pool.acquire().await?;
        let todo = TodoRepository::insert(&mut conn, caller.user_id, &input).await?;

        debug!("User {} created todo {}", caller.user_id, todo.id);
        Ok(todo)
    }

    pub async fn list(&self, caller: &AuthUser) -> Result<Vec<Todo>, TodoError> {
        let mut conn = self.pool.acquire().await?;
        let todos = TodoRepository::select_by_owner(&mut conn, caller.user_id).await?;
        Ok(todos)
    }

    /// Full replace of the mutable fields; omitted input fields fall back to their defaults
    pub async fn update(&self, caller: &AuthUser, id: i64, input: TodoInput) -> Result<Todo, TodoError> {
        validate(&input)?;

        let mut conn = self.pool.acquire().await?;
        match TodoRepository::update(&mut conn, id, caller.user_id, &input).await? {
            Some(todo) => {
                debug!("User {} updated todo {}", caller.user_id, id);
                Ok(todo)
            }
            None => Err(explain_miss(&mut conn, caller, id).await),
        }
    }

    pub async fn delete(&self, caller: &AuthUser, id: i64) -> Result<(), TodoError> {
        let mut conn = self.pool.acquire().await?;
        if TodoRepository::delete(&mut conn, id, caller.user_id).await? == 0 {
            return Err(explain_miss(&mut conn, caller, id).await);
        }

        debug!("User {} deleted todo {}", caller.user_id, id);
        Ok(())
    }
}

/// Why an owner-qualified write touched no row: absent rows are NotFound,
/// rows owned by someone else are Forbidden.
async fn explain_miss(conn: &mut SqliteConnection, caller: &AuthUser, id: i64) -> TodoError {
    match TodoRepository::select_one(conn, id).await {
        Ok(Some(todo)) if todo.owner_id != caller.user_id => TodoError::Forbidden(id),
        Ok(_) => TodoError::NotFound(id),
        Err(e) => TodoError::Store(e),
    }
}

fn validate(input: &TodoInput) -> Result<(), TodoError> {
    if input.title.trim().is_empty() {
        return Err(TodoError::Validation {
            field: "title",
            message: "Title must not be empty".to_string(),
        });
    }
    Ok(())
}
