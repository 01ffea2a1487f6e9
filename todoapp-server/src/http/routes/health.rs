//! Readiness endpoint
//!
//! `GET /health` opens a read-only transaction through the same runner (and
//! therefore the same connection gate) as the todo routes and counts rows.
//! A store that cannot hand out a connection answers 503.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use todoapp_core::{AccessMode, Isolation, StoreError, TodoStore, Transactional};

use crate::http::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Rows visible to the check; absent when the store is unavailable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub todos: Option<i32>,
}

/// GET /health
async fn health<D>(State(state): State<Arc<AppState<D>>>) -> (StatusCode, Json<HealthResponse>)
where
    D: Transactional + 'static,
{
    let counted = state
        .todos
        .database()
        .run(Isolation::ReadCommitted, AccessMode::ReadOnly, |tx| {
            Box::pin(async move { tx.count().await })
        })
        .await;

    match counted {
        Ok(count) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                version: env!("CARGO_PKG_VERSION"),
                todos: Some(count),
            }),
        ),
        Err(err) => {
            log_unavailable(&err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable",
                    version: env!("CARGO_PKG_VERSION"),
                    todos: None,
                }),
            )
        }
    }
}

fn log_unavailable(err: &StoreError) {
    match err {
        StoreError::ResourceExhausted => tracing::warn!("health check: connection pool exhausted"),
        other => tracing::error!(sqlstate = ?other.sqlstate(), "health check failed: {}", other),
    }
}

pub fn router<D>() -> Router<Arc<AppState<D>>>
where
    D: Transactional + 'static,
{
    Router::new().route("/health", get(health::<D>))
}
