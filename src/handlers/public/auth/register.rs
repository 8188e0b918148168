use axum::{extract::rejection::JsonRejection, extract::State, Json};

use super::CredentialsRequest;
use crate::app::AppState;
use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult};

/// POST /auth/register - Create an account
///
/// Input: `{"username": "alice", "password": "at-least-8-chars"}`
/// Output: 201 with the new user (id, username, created_at). 409 if the username is taken.
pub async fn register_post(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> ApiResult<User> {
    let Json(body) = payload?;
    let user = state.users.register(&body.username, &body.password).await?;
    Ok(ApiResponse::created(user))
}
