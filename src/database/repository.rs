// Statement-level access to the todos and users tables.
//
// Every function borrows a connection instead of the pool so the caller decides
// the unit of work: a plain pooled connection or an open transaction.

use sqlx::SqliteConnection;

use crate::database::models::{Todo, TodoInput, User};

const TODO_COLUMNS: &str = "id, title, description, status, priority, due_date, created_at, owner_id";
const USER_COLUMNS: &str = "id, username, password_hash, created_at";

pub struct TodoRepository;

impl TodoRepository {
    pub async fn insert(
        conn: &mut SqliteConnection,
        owner_id: i64,
        input: &TodoInput,
    ) -> Result<Todo, sqlx::Error> {
        let sql = format!(
            "INSERT INTO todos (title, description, status, priority, due_date, owner_id) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING {}",
            TODO_COLUMNS
        );

        sqlx::query_as::<_, Todo>(&sql)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status)
            .bind(input.priority.as_str())
            .bind(&input.due_date)
            .bind(owner_id)
            .fetch_one(&mut *conn)
            .await
    }

    /// All todos of one owner, in insertion order
    pub async fn select_by_owner(
        conn: &mut SqliteConnection,
        owner_id: i64,
    ) -> Result<Vec<Todo>, sqlx::Error> {
        let sql = format!("SELECT {} FROM todos WHERE owner_id = ? ORDER BY id", TODO_COLUMNS);

        sqlx::query_as::<_, Todo>(&sql)
            .bind(owner_id)
            .fetch_all(&mut *conn)
            .await
    }

    pub async fn select_one(conn: &mut SqliteConnection, id: i64) -> Result<Option<Todo>, sqlx::Error> {
        let sql = format!("SELECT {} FROM todos WHERE id = ?", TODO_COLUMNS);

        sqlx::query_as::<_, Todo>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Replace every mutable field of an owned todo. `None` when no owned row matched.
    pub async fn update(
        conn: &mut SqliteConnection,
        id: i64,
        owner_id: i64,
        input: &TodoInput,
    ) -> Result<Option<Todo>, sqlx::Error> {
        let sql = format!(
            "UPDATE todos SET title = ?, description = ?, status = ?, priority = ?, due_date = ? \
             WHERE id = ? AND owner_id = ? RETURNING {}",
            TODO_COLUMNS
        );

        sqlx::query_as::<_, Todo>(&sql)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status)
            .bind(input.priority.as_str())
            .bind(&input.due_date)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&mut *conn)
            .await
    }

    /// Returns the number of rows removed (0 or 1)
    pub async fn delete(conn: &mut SqliteConnection, id: i64, owner_id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }
}

pub struct UserRepository;

impl UserRepository {
    pub async fn insert(
        conn: &mut SqliteConnection,
        username: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        let sql = format!(
            "INSERT INTO users (username, password_hash) VALUES (?, ?) RETURNING {}",
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .bind(password_hash)
            .fetch_one(&mut *conn)
            .await
    }

    pub async fn find_by_username(
        conn: &mut SqliteConnection,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let sql = format!("SELECT {} FROM users WHERE username = ?", USER_COLUMNS);

        sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&mut *conn)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::database::models::Priority;
    use crate::database::DatabaseManager;

    #[tokio::test]
    async fn todo_rows_round_trip_through_sql() {
        let pool = DatabaseManager::connect(&DatabaseConfig::in_memory()).await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        let owner = UserRepository::insert(&mut conn, "alice", "salt$hash").await.unwrap();
        let input = TodoInput {
            title: "Water plants".to_string(),
            description: Some("balcony".to_string()),
            status: true,
            priority: Priority::High,
            due_date: Some("2024-06-01".to_string()),
        };

        let created = TodoRepository::insert(&mut conn, owner.id, &input).await.unwrap();
        assert_eq!(created.priority, Priority::High);
        assert!(created.status);
        assert!(created.created_at.ends_with('Z'));

        let fetched = TodoRepository::select_one(&mut conn, created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn update_and_delete_only_touch_owned_rows() {
        let pool = DatabaseManager::connect(&DatabaseConfig::in_memory()).await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        let alice = UserRepository::insert(&mut conn, "alice", "x$y").await.unwrap();
        let bob = UserRepository::insert(&mut conn, "bob", "x$y").await.unwrap();
        let todo = TodoRepository::insert(&mut conn, alice.id, &TodoInput::new("mine")).await.unwrap();

        let updated = TodoRepository::update(&mut conn, todo.id, bob.id, &TodoInput::new("stolen"))
            .await
            .unwrap();
        assert!(updated.is_none());
        assert_eq!(TodoRepository::delete(&mut conn, todo.id, bob.id).await.unwrap(), 0);
        assert_eq!(TodoRepository::delete(&mut conn, todo.id, alice.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn todos_require_an_existing_owner() {
        let pool = DatabaseManager::connect(&DatabaseConfig::in_memory()).await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        let result = TodoRepository::insert(&mut conn, 404, &TodoInput::new("orphan")).await;
        assert!(result.is_err(), "foreign key should reject unknown owner");
    }

    #[tokio::test]
    async fn usernames_are_unique() {
        let pool = DatabaseManager::connect(&DatabaseConfig::in_memory()).await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        UserRepository::insert(&mut conn, "alice", "a$b").await.unwrap();
        let err = UserRepository::insert(&mut conn, "alice", "c$d").await.unwrap_err();
        let is_unique = err
            .as_database_error()
            .map(|db| db.is_unique_violation())
            .unwrap_or(false);
        assert!(is_unique, "expected unique violation, got {}", err);

        let found = UserRepository::find_by_username(&mut conn, "alice").await.unwrap();
        assert_eq!(found.map(|u| u.password_hash), Some("a$b".to_string()));
    }
}
