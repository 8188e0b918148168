use axum::Extension;

use crate::auth::AuthUser;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /auth/whoami - The identity the current token resolves to
pub async fn get(Extension(user): Extension<AuthUser>) -> ApiResult<AuthUser> {
    Ok(ApiResponse::success(user))
}
