//! Todo endpoints
//!
//! Every payload is wrapped in a `{"todo": ...}` envelope.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use todoapp_core::{Todo, TodoId, TodoPatch, Transactional};

use crate::http::error::ApiError;
use crate::http::server::AppState;

/// Todo as rendered on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoView {
    pub id: i32,
    pub text: String,
    pub done: bool,
    pub index: i32,
}

impl From<Todo> for TodoView {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id.get(),
            text: todo.text,
            done: todo.done,
            index: todo.index,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TodoCreateRequest {
    pub todo: TodoCreate,
}

#[derive(Debug, Deserialize)]
pub struct TodoCreate {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct TodoUpdateRequest {
    pub todo: TodoUpdate,
}

#[derive(Debug, Default, Deserialize)]
pub struct TodoUpdate {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub done: Option<bool>,
}

impl From<TodoUpdate> for TodoPatch {
    fn from(update: TodoUpdate) -> Self {
        Self {
            text: update.text,
            done: update.done,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TodoResponse {
    pub todo: TodoView,
}

#[derive(Debug, Serialize)]
pub struct TodoListResponse {
    pub todo: Vec<TodoView>,
}

/// An id segment that is not an integer cannot name a todo.
fn parse_id(raw: &str) -> Option<TodoId> {
    raw.parse::<i32>().ok().map(TodoId::new)
}

/// GET /todo - all todos in list order
async fn list_todos<D>(
    State(state): State<Arc<AppState<D>>>,
) -> Result<Json<TodoListResponse>, ApiError>
where
    D: Transactional + 'static,
{
    let todos = state.todos.list().await?;
    Ok(Json(TodoListResponse {
        todo: todos.into_iter().map(TodoView::from).collect(),
    }))
}

/// POST /todo - append a todo
async fn create_todo<D>(
    State(state): State<Arc<AppState<D>>>,
    body: Result<Json<TodoCreateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoResponse>), ApiError>
where
    D: Transactional + 'static,
{
    let Json(req) = body?;
    let todo = state.todos.create(&req.todo.text).await?;

    Ok((
        StatusCode::CREATED,
        Json(TodoResponse {
            todo: TodoView::from(todo),
        }),
    ))
}

/// PUT /todo/{id} - change text and/or completion
async fn update_todo<D>(
    State(state): State<Arc<AppState<D>>>,
    Path(id): Path<String>,
    body: Result<Json<TodoUpdateRequest>, JsonRejection>,
) -> Result<Json<TodoResponse>, ApiError>
where
    D: Transactional + 'static,
{
    let id = parse_id(&id).ok_or(ApiError::NotFound)?;
    let Json(req) = body?;
    let todo = state.todos.update(id, req.todo.into()).await?;

    Ok(Json(TodoResponse {
        todo: TodoView::from(todo),
    }))
}

/// DELETE /todo/{id} - remove a todo; unknown ids are ignored
async fn delete_todo<D>(
    State(state): State<Arc<AppState<D>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
    D: Transactional + 'static,
{
    if let Some(id) = parse_id(&id) {
        state.todos.delete(id).await?;
    }
    Ok(StatusCode::OK)
}

/// Todo routes
pub fn router<D>() -> Router<Arc<AppState<D>>>
where
    D: Transactional + 'static,
{
    Router::new()
        .route("/todo", get(list_todos::<D>).post(create_todo::<D>))
        .route("/todo/{id}", put(update_todo::<D>).delete(delete_todo::<D>))
}
