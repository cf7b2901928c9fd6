//! Generic authenticated HTTP helper the views talk through.
//!
//! The session token is an explicit input (constructor / setter), never
//! ambient state. Non-2xx responses surface as ClientError::Api with the
//! response body as the message.

use crate::models::{LoginResponse, Task};
use reqwest::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

/// The one write DTO shared by the add and edit forms. The variant decides
/// the HTTP operation: Create → POST /api/tasks, Update → PUT /api/tasks/:id.
#[derive(Debug, Clone)]
pub enum TaskWrite {
    Create { description: String, completed: bool },
    Update { id: Uuid, description: String, completed: bool },
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. "http://localhost:3000".
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        ApiClient {
            http: reqwest::Client::new(),
            base_url,
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    // ── Session ────────────────────────────────────────────────

    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<LoginResponse, ClientError> {
        let response = self
            .send(
                Method::POST,
                "/api/auth/login",
                Some(json!({ "username": username, "password": password })),
            )
            .await?;
        decode(response).await
    }

    // ── Tasks ──────────────────────────────────────────────────

    pub async fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        let response = self.send(Method::GET, "/api/tasks", None).await?;
        decode(response).await
    }

    pub async fn get_task(&self, id: Uuid) -> Result<Task, ClientError> {
        let response = self
            .send(Method::GET, &format!("/api/tasks/{id}"), None)
            .await?;
        decode(response).await
    }

    pub async fn save_task(&self, write: &TaskWrite) -> Result<Task, ClientError> {
        let response = match write {
            TaskWrite::Create { description, completed } => {
                self.send(
                    Method::POST,
                    "/api/tasks",
                    Some(json!({ "description": description, "completed": completed })),
                )
                .await?
            }
            TaskWrite::Update { id, description, completed } => {
                self.send(
                    Method::PUT,
                    &format!("/api/tasks/{id}"),
                    Some(json!({ "description": description, "completed": completed })),
                )
                .await?
            }
        };
        decode(response).await
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<(), ClientError> {
        self.send(Method::DELETE, &format!("/api/tasks/{id}"), None)
            .await?;
        Ok(())
    }

    // ── Plumbing ───────────────────────────────────────────────

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response, ClientError> {
        let mut request = self.http.request(method, format!("{}{path}", self.base_url));

        if let Some(token) = &self.token {
            request = request.header(reqwest::header::AUTHORIZATION, token.as_str());
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status,
                message,
            });
        }
        Ok(response)
    }
}

async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    response.json::<T>().await.map_err(ClientError::from)
}

// ── Errors ─────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ClientError {
    /// Could not reach the server or read the response.
    Transport(String),
    /// The server answered with a non-2xx status.
    Api { status: StatusCode, message: String },
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(e.to_string())
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Transport(e) => write!(f, "transport: {e}"),
            ClientError::Api { status, message } => write!(f, "{status}: {message}"),
        }
    }
}
