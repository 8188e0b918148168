use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};
use serde_json::Value;

use crate::app::AppState;
use crate::auth::AuthUser;
use crate::database::models::{Todo, TodoInput};
use crate::middleware::{ApiResponse, ApiResult};

/// PUT /todos/:id - Replace a todo's fields
///
/// 404 when the id does not exist, 403 when it belongs to someone else.
pub async fn put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<TodoInput>, JsonRejection>,
) -> ApiResult<Todo> {
    let Path(id) = id?;
    let Json(input) = payload?;

    let todo = state.todos.update(&user, id, input).await?;
    Ok(ApiResponse::success(todo))
}

/// DELETE /todos/:id - Permanently remove a todo
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Value> {
    let Path(id) = id?;

    state.todos.delete(&user, id).await?;
    Ok(ApiResponse::message("Todo deleted successfully"))
}
