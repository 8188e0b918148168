use serde_json::{json, Value};
use std::io::{self, BufRead, Write};

use crate::cli::OutputFormat;
use crate::database::models::Todo;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(object)) = (data, response.as_object_mut()) {
                object.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a todo list, one line per todo in text mode
pub fn output_todos(output_format: &OutputFormat, todos: &[Todo]) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "todos": todos }))?);
        }
        OutputFormat::Text => {
            if todos.is_empty() {
                println!("No todos yet");
            }
            for todo in todos {
                println!("{}", format_todo_line(todo));
            }
        }
    }
    Ok(())
}

pub fn format_todo_line(todo: &Todo) -> String {
    let mark = if todo.status { "x" } else { " " };
    let mut line = format!("[{}] {:>4}  {:<6}  {}", mark, todo.id, todo.priority, todo.title);

    if let Some(due) = &todo.due_date {
        line.push_str(&format!("  (due {})", due));
    }
    if let Some(description) = todo.description.as_deref().filter(|d| !d.is_empty()) {
        line.push_str(&format!("\n           {}", description));
    }
    line
}

/// Use the provided password or prompt for one on stdin
pub fn read_password(provided: Option<String>) -> anyhow::Result<String> {
    if let Some(password) = provided {
        return Ok(password);
    }

    print!("Password: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        anyhow::bail!("Password is required");
    }
    Ok(password)
}
