use axum::{extract::rejection::JsonRejection, extract::State, Json};

use super::CredentialsRequest;
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::LoginResponse;

/// POST /auth/login - Authenticate and receive a bearer token
///
/// Output:
/// ```json
/// {
///   "success": true,
///   "data": {
///     "token": "eyJhbGciOiJIUzI1NiI...",
///     "token_type": "Bearer",
///     "expires_in": 604800,
///     "user": { "id": 1, "username": "alice", "created_at": "..." }
///   }
/// }
/// ```
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let Json(body) = payload?;
    let login = state.users.login(&body.username, &body.password).await?;
    Ok(ApiResponse::success(login))
}
