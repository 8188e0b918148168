use serde::{Deserialize, Deserializer, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Closed set of todo priorities, stored as lowercase text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Error)]
#[error("invalid priority '{0}', expected one of: low, medium, high")]
pub struct InvalidPriority(pub String);

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = InvalidPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(InvalidPriority(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: bool,
    pub priority: Priority,
    pub due_date: Option<String>,
    pub created_at: String,
    pub owner_id: i64,
}

impl<'r> FromRow<'r, SqliteRow> for Todo {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let priority: String = row.try_get("priority")?;
        let priority = priority.parse::<Priority>().map_err(|e| sqlx::Error::ColumnDecode {
            index: "priority".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            status: row.try_get("status")?,
            priority,
            due_date: row.try_get("due_date")?,
            created_at: row.try_get("created_at")?,
            owner_id: row.try_get("owner_id")?,
        })
    }
}

/// Create/update request body. Ownership is never read from here; unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TodoInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<String>,
}

impl TodoInput {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: false,
            priority: Priority::default(),
            due_date: None,
        }
    }
}

// An explicit `null` falls back to the field default, same as omitting it
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn priority_parses_only_known_values() {
        assert_eq!("low".parse::<Priority>().unwrap(), Priority::Low);
        assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
        assert!("HIGH".parse::<Priority>().is_err());
    }

    #[test]
    fn input_applies_defaults() {
        let input: TodoInput = serde_json::from_value(json!({ "title": "Buy milk" })).unwrap();
        assert_eq!(input, TodoInput::new("Buy milk"));
        assert_eq!(input.priority, Priority::Medium);
        assert!(!input.status);
    }

    #[test]
    fn input_treats_null_as_default() {
        let input: TodoInput =
            serde_json::from_value(json!({ "title": "x", "status": null, "priority": null })).unwrap();
        assert!(!input.status);
        assert_eq!(input.priority, Priority::Medium);
    }

    #[test]
    fn input_rejects_unknown_priority_and_missing_title() {
        assert!(serde_json::from_value::<TodoInput>(json!({ "title": "x", "priority": "urgent" })).is_err());
        assert!(serde_json::from_value::<TodoInput>(json!({ "description": "no title" })).is_err());
    }

    #[test]
    fn input_ignores_client_supplied_owner() {
        let input: TodoInput =
            serde_json::from_value(json!({ "title": "x", "owner_id": 99, "user_id": 99 })).unwrap();
        assert_eq!(input, TodoInput::new("x"));
    }

    #[test]
    fn todo_serializes_priority_lowercase() {
        let todo = Todo {
            id: 1,
            title: "Buy milk".to_string(),
            description: None,
            status: false,
            priority: Priority::High,
            due_date: None,
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
            owner_id: 3,
        };
        let value = serde_json::to_value(&todo).unwrap();
        assert_eq!(value["priority"], "high");
        assert!(value["description"].is_null());
        assert_eq!(value["owner_id"], 3);
    }
}
