use clap::Subcommand;
use serde_json::json;

use crate::cli::client::ApiClient;
use crate::cli::config::Session;
use crate::cli::utils::{output_success, output_todos};
use crate::cli::OutputFormat;
use crate::database::models::{Priority, Todo, TodoInput};

#[derive(Subcommand)]
pub enum TodoCommands {
    #[command(about = "List your todos")]
    List,

    #[command(about = "Create a todo")]
    Add {
        #[arg(help = "Title")]
        title: String,
        #[arg(long, short, help = "Description")]
        description: Option<String>,
        #[arg(long, short, help = "Priority: low, medium or high")]
        priority: Option<String>,
        #[arg(long, help = "Due date (free-form text)")]
        due: Option<String>,
    },

    #[command(about = "Replace a todo; fields not given are reset to their defaults")]
    Edit {
        #[arg(help = "Todo ID")]
        id: i64,
        #[arg(help = "New title")]
        title: String,
        #[arg(long, short, help = "Description")]
        description: Option<String>,
        #[arg(long, short, help = "Priority: low, medium or high")]
        priority: Option<String>,
        #[arg(long, help = "Due date (free-form text)")]
        due: Option<String>,
        #[arg(long, help = "Mark as completed")]
        done: bool,
    },

    #[command(about = "Flip a todo's completion status, keeping everything else")]
    Toggle {
        #[arg(help = "Todo ID")]
        id: i64,
    },

    #[command(about = "Delete a todo")]
    Rm {
        #[arg(help = "Todo ID")]
        id: i64,
    },
}

pub async fn handle(
    cmd: TodoCommands,
    server: &str,
    session: Session,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let token = session
        .active_token()
        .ok_or_else(|| anyhow::anyhow!("Not logged in; run `todo auth login <username>`"))?;
    let client = ApiClient::new(server, Some(token.to_string()))?;

    match cmd {
        TodoCommands::List => {
            let todos = client.list_todos().await?;
            output_todos(&output_format, &todos)
        }
        TodoCommands::Add { title, description, priority, due } => {
            let input = build_input(title, description, priority, due, false)?;
            let todo = client.create_todo(&input).await?;
            output_success(&output_format, &format!("Created todo {}", todo.id), Some(json!({ "todo": todo })))
        }
        TodoCommands::Edit { id, title, description, priority, due, done } => {
            let input = build_input(title, description, priority, due, done)?;
            let todo = client.update_todo(id, &input).await?;
            output_success(&output_format, &format!("Updated todo {}", todo.id), Some(json!({ "todo": todo })))
        }
        TodoCommands::Toggle { id } => {
            let current = client
                .list_todos()
                .await?
                .into_iter()
                .find(|todo| todo.id == id)
                .ok_or_else(|| anyhow::anyhow!("Todo {} not found", id))?;

            let todo = client.update_todo(id, &toggled(&current)).await?;
            let state = if todo.status { "done" } else { "open" };
            output_success(
                &output_format,
                &format!("Todo {} is now {}", todo.id, state),
                Some(json!({ "todo": todo })),
            )
        }
        TodoCommands::Rm { id } => {
            let message = client.delete_todo(id).await?;
            output_success(&output_format, &message, Some(json!({ "id": id })))
        }
    }
}

fn build_input(
    title: String,
    description: Option<String>,
    priority: Option<String>,
    due_date: Option<String>,
    status: bool,
) -> anyhow::Result<TodoInput> {
    let priority = match priority {
        Some(p) => p.to_lowercase().parse::<Priority>()?,
        None => Priority::default(),
    };

    Ok(TodoInput {
        title,
        description,
        status,
        priority,
        due_date,
    })
}

/// Full-replace payload that only flips completion
fn toggled(todo: &Todo) -> TodoInput {
    TodoInput {
        title: todo.title.clone(),
        description: todo.description.clone(),
        status: !todo.status,
        priority: todo.priority,
        due_date: todo.due_date.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_keeps_every_other_field() {
        let todo = Todo {
            id: 4,
            title: "Call mom".to_string(),
            description: Some("Sunday".to_string()),
            status: false,
            priority: Priority::High,
            due_date: Some("2024-05-12".to_string()),
            created_at: "2024-05-01T10:00:00.000Z".to_string(),
            owner_id: 1,
        };

        let input = toggled(&todo);
        assert!(input.status);
        assert_eq!(input.title, todo.title);
        assert_eq!(input.description, todo.description);
        assert_eq!(input.priority, Priority::High);
        assert_eq!(input.due_date, todo.due_date);
    }

    #[test]
    fn build_input_parses_priority_case_insensitively() {
        let input = build_input("x".to_string(), None, Some("HIGH".to_string()), None, false).unwrap();
        assert_eq!(input.priority, Priority::High);

        assert!(build_input("x".to_string(), None, Some("urgent".to_string()), None, false).is_err());
        assert_eq!(
            build_input("x".to_string(), None, None, None, true).unwrap().priority,
            Priority::Medium
        );
    }
}
