use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::database::models::{Todo, TodoInput};

/// Account fields echoed back by register/login
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenGrant {
    pub token: String,
    pub expires_in: i64,
    pub user: Account,
}

/// Error body returned by the API for any non-2xx response
#[derive(Debug, thiserror::Error)]
#[error("{message} ({code}, HTTP {status})")]
pub struct ApiFailure {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
}

/// Thin typed wrapper over the HTTP API
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub async fn register(&self, username: &str, password: &str) -> anyhow::Result<Account> {
        let body = serde_json::json!({ "username": username, "password": password });
        self.send(Method::POST, "/auth/register", Some(&body)).await
    }

    pub async fn login(&self, username: &str, password: &str) -> anyhow::Result<TokenGrant> {
        let body = serde_json::json!({ "username": username, "password": password });
        self.send(Method::POST, "/auth/login", Some(&body)).await
    }

    pub async fn whoami(&self) -> anyhow::Result<Value> {
        self.send::<Value, ()>(Method::GET, "/auth/whoami", None).await
    }

    pub async fn list_todos(&self) -> anyhow::Result<Vec<Todo>> {
        self.send::<_, ()>(Method::GET, "/todos", None).await
    }

    pub async fn create_todo(&self, input: &TodoInput) -> anyhow::Result<Todo> {
        self.send(Method::POST, "/todos", Some(input)).await
    }

    pub async fn update_todo(&self, id: i64, input: &TodoInput) -> anyhow::Result<Todo> {
        self.send(Method::PUT, &format!("/todos/{}", id), Some(input)).await
    }

    pub async fn delete_todo(&self, id: i64) -> anyhow::Result<String> {
        let data: Value = self.send::<_, ()>(Method::DELETE, &format!("/todos/{}", id), None).await?;
        Ok(data
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Todo deleted")
            .to_string())
    }

    async fn send<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> anyhow::Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method, &url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let payload: Value = response.json().await?;

        if !status.is_success() {
            return Err(ApiFailure {
                status,
                code: payload["code"].as_str().unwrap_or("UNKNOWN").to_string(),
                message: payload["message"].as_str().unwrap_or("request failed").to_string(),
            }
            .into());
        }

        let data = payload.get("data").cloned().unwrap_or(Value::Null);
        Ok(serde_json::from_value(data)?)
    }
}
