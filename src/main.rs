use clap::Parser;
use tracing_subscriber::EnvFilter;

use todo_api_rust::config::{self, AppConfig};
use todo_api_rust::database::DatabaseManager;
use todo_api_rust::{app, is_development, AppState};

#[derive(Parser)]
#[command(name = "todo-api-rust")]
#[command(about = "Personal todo tracking API server")]
#[command(version)]
struct Args {
    #[arg(long, help = "Port to listen on (overrides API_PORT/PORT)")]
    port: Option<u16>,

    #[arg(long, help = "SQLite connection URL (overrides DATABASE_URL)")]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECURITY_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config: AppConfig = config::config().clone();
    if let Some(port) = args.port {
        config.api.port = port;
    }
    if let Some(url) = args.database_url {
        config.database.url = url;
    }

    tracing::info!("Starting Todo API in {:?} mode", config.environment);
    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("SECURITY_JWT_SECRET must be set outside development");
    }
    if is_development!() {
        tracing::warn!("Using development defaults; set SECURITY_JWT_SECRET before exposing this server");
    }

    let pool = DatabaseManager::connect(&config.database).await?;
    let state = AppState::new(pool.clone(), &config);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Todo API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Database pool closed");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
