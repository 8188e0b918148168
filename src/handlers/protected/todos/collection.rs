use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::database::models::{Todo, TodoInput};
use crate::middleware::{ApiResponse, ApiResult};

/// GET /todos - All todos owned by the caller, in creation order
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<Todo>> {
    let todos = state.todos.list(&user).await?;
    Ok(ApiResponse::success(todos))
}

/// POST /todos - Create a todo owned by the caller
///
/// Input: `{"title": "Buy milk", "description"?, "status"?, "priority"?: "low|medium|high", "due_date"?}`
pub async fn post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<TodoInput>, JsonRejection>,
) -> ApiResult<Todo> {
    let Json(input) = payload?;
    let todo = state.todos.create(&user, input).await?;
    Ok(ApiResponse::created(todo))
}
