use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{IdentityResolver, JwtManager};
use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::handlers;
use crate::middleware::identity_middleware;
use crate::services::{TodoService, UserService};

/// Shared dependencies handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub todos: TodoService,
    pub users: UserService,
    pub identity: Arc<dyn IdentityResolver>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire services over one pool; bearer tokens are both issued and resolved by the same `JwtManager`
    pub fn new(pool: SqlitePool, config: &AppConfig) -> Self {
        let tokens = Arc::new(JwtManager::from_config(&config.security));

        Self {
            todos: TodoService::new(pool.clone()),
            users: UserService::new(pool.clone(), tokens.clone()),
            identity: tokens,
            config: Arc::new(config.clone()),
            pool,
        }
    }

    /// Swap the identity resolver, e.g. for a fixed-identity double in tests
    pub fn with_identity_resolver(mut self, identity: Arc<dyn IdentityResolver>) -> Self {
        self.identity = identity;
        self
    }
}

pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_public_routes())
        // Protected
        .merge(protected_routes(state.clone()))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security.cors_origins));
    }

    router.with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use handlers::public::auth;

    Router::new()
        .route("/auth/register", post(auth::register_post))
        .route("/auth/login", post(auth::login_post))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use handlers::protected::{auth, todos};

    Router::new()
        .route("/auth/whoami", get(auth::whoami_get))
        // Collection
        .route("/todos", get(todos::collection_get).post(todos::collection_post))
        // Individual record
        .route("/todos/:id", put(todos::record_put).delete(todos::record_delete))
        .route_layer(middleware::from_fn_with_state(state, identity_middleware))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Todo API (Rust)",
            "version": version,
            "description": "Personal todo tracking API built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "auth": "/auth/register, /auth/login (public), /auth/whoami (protected)",
                "todos": "/todos[/:id] (protected)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database": "unavailable"
                    }
                })),
            )
        }
    }
}
