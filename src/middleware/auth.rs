use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::error::ApiError;

/// Resolves the caller through the configured `IdentityResolver` and injects the
/// resulting `AuthUser` into request extensions. Runs before any body extraction,
/// so unauthenticated requests never reach validation or the store.
pub async fn identity_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = state.identity.resolve(&headers).await.map_err(|e| {
        tracing::warn!("Rejected {} {}: {}", request.method(), request.uri().path(), e);
        ApiError::from(e)
    })?;

    request.extensions_mut().insert(auth_user);
    Ok(next.run(request).await)
}
