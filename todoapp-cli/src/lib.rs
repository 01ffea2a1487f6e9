//! todoctl: HTTP client for the todoapp API
//!
//! [`TodoClient`] wraps the four todo endpoints; the `render_*` helpers
//! produce the human-readable output of the binary.

use anyhow::{anyhow, Context, Result};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Default API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:3030";

/// Todo as returned by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i32,
    pub text: String,
    pub done: bool,
    pub index: i32,
}

#[derive(Serialize)]
struct TodoCreateRequest<'a> {
    todo: TodoCreate<'a>,
}

#[derive(Serialize)]
struct TodoCreate<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct TodoUpdateRequest<'a> {
    todo: TodoUpdate<'a>,
}

#[derive(Serialize, Default)]
struct TodoUpdate<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    done: Option<bool>,
}

#[derive(Deserialize)]
struct TodoResponse {
    todo: Todo,
}

#[derive(Deserialize)]
struct TodoListResponse {
    todo: Vec<Todo>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    message: String,
}

/// Client for one todoapp server
#[derive(Debug, Clone)]
pub struct TodoClient {
    client: Client,
    endpoint: String,
}

impl TodoClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    pub async fn list(&self) -> Result<Vec<Todo>> {
        let response = self
            .client
            .get(self.url("/todo"))
            .send()
            .await
            .context("Failed to connect to todoapp API")?;

        let body: TodoListResponse = handle_response(response).await?;
        Ok(body.todo)
    }

    pub async fn create(&self, text: &str) -> Result<Todo> {
        let response = self
            .client
            .post(self.url("/todo"))
            .json(&TodoCreateRequest {
                todo: TodoCreate { text },
            })
            .send()
            .await
            .context("Failed to connect to todoapp API")?;

        let body: TodoResponse = handle_response(response).await?;
        Ok(body.todo)
    }

    /// Change text and/or completion; `None` fields are left untouched.
    pub async fn update(&self, id: i32, text: Option<&str>, done: Option<bool>) -> Result<Todo> {
        let response = self
            .client
            .put(self.url(&format!("/todo/{}", id)))
            .json(&TodoUpdateRequest {
                todo: TodoUpdate { text, done },
            })
            .send()
            .await
            .context("Failed to connect to todoapp API")?;

        let body: TodoResponse = handle_response(response).await?;
        Ok(body.todo)
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/todo/{}", id)))
            .send()
            .await
            .context("Failed to connect to todoapp API")?;

        ensure_success(response).await
    }
}

async fn error_from(response: Response) -> anyhow::Error {
    let status = response.status();
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    match serde_json::from_str::<ErrorResponse>(&error_text) {
        Ok(error) => anyhow!("{}: {}", status, error.message),
        Err(_) => anyhow!("{}: {}", status, error_text),
    }
}

async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    if response.status().is_success() {
        response.json::<T>().await.context("Failed to parse response")
    } else {
        Err(error_from(response).await)
    }
}

async fn ensure_success(response: Response) -> Result<()> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(error_from(response).await)
    }
}

/// One line per todo: `[v] 1: Buy milk`
pub fn render_todo(todo: &Todo) -> String {
    let mark = if todo.done { "v" } else { " " };
    format!("[{}] {}: {}", mark, todo.id, todo.text)
}

pub fn render_list(todos: &[Todo]) -> String {
    if todos.is_empty() {
        return "No todo".to_string();
    }
    todos.iter().map(render_todo).collect::<Vec<_>>().join("\n")
}
