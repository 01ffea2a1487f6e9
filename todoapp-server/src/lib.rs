//! todoapp-server: HTTP server for the ordered todo store
//!
//! PostgreSQL backend for `todoapp-core` (gated connection checkout,
//! isolation-aware transaction runner, todo repository, schema bootstrap)
//! and the axum JSON API in front of it.

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod tracing_setup;

pub use config::ServerArgs;
pub use error::{ServerError, ServerResult};
