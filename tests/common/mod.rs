#![allow(dead_code)]

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use todo_api_rust::config::{AppConfig, DatabaseConfig};
use todo_api_rust::database::DatabaseManager;
use todo_api_rust::{app, AppState};

pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
}

/// Serve the full router on an ephemeral port, backed by a private in-memory database.
/// The server task lives as long as the test's runtime.
pub async fn spawn_server() -> Result<TestServer> {
    let mut config = AppConfig::development();
    config.database = DatabaseConfig::in_memory();
    config.security.jwt_secret = "integration-test-secret".to_string();
    config.api.enable_request_logging = false;

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to open in-memory database")?;
    let router = app(AppState::new(pool, &config));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind ephemeral port")?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server");
    });

    Ok(TestServer {
        base_url: format!("http://{}", addr),
        client: reqwest::Client::new(),
    })
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Register `username` and return a bearer token for it
    pub async fn login_as(&self, username: &str) -> Result<String> {
        let credentials = json!({ "username": username, "password": "password123" });

        let res = self.client.post(self.url("/auth/register")).json(&credentials).send().await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());

        let res = self.client.post(self.url("/auth/login")).json(&credentials).send().await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());

        let body: Value = res.json().await?;
        body["data"]["token"]
            .as_str()
            .map(str::to_string)
            .context("login response has no token")
    }

    pub async fn create_todo(&self, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        let res = self.client.post(self.url("/todos")).bearer_auth(token).json(&body).send().await?;
        Ok((res.status(), res.json().await?))
    }

    pub async fn list_todos(&self, token: &str) -> Result<(StatusCode, Value)> {
        let res = self.client.get(self.url("/todos")).bearer_auth(token).send().await?;
        Ok((res.status(), res.json().await?))
    }

    pub async fn update_todo(&self, token: &str, id: i64, body: Value) -> Result<(StatusCode, Value)> {
        let res = self
            .client
            .put(self.url(&format!("/todos/{}", id)))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        Ok((res.status(), res.json().await?))
    }

    pub async fn delete_todo(&self, token: &str, id: i64) -> Result<(StatusCode, Value)> {
        let res = self
            .client
            .delete(self.url(&format!("/todos/{}", id)))
            .bearer_auth(token)
            .send()
            .await?;
        Ok((res.status(), res.json().await?))
    }
}
