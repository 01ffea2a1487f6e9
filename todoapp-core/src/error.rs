//! Error types for todoapp-core
//!
//! `StoreError` covers everything a backend can report; `TodoError` is what
//! the use cases return to their caller.

use thiserror::Error;

use crate::todo::TodoId;
use crate::validation::ValidationError;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// SQLSTATE codes that mean "a concurrent transaction won, try again".
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";

/// Failure reported by a store backend or the transaction runner.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The database rejected a statement, a commit, or the connection dropped
    #[error("database error: {source}")]
    Database {
        sqlstate: Option<String>,
        #[source]
        source: BoxError,
    },

    /// No connection could be checked out before the pool gave up
    #[error("connection pool exhausted")]
    ResourceExhausted,

    /// Write attempted inside a read-only transaction
    #[error("cannot write in a read-only transaction")]
    ReadOnly,
}

impl StoreError {
    pub fn database(source: impl Into<BoxError>, sqlstate: Option<String>) -> Self {
        Self::Database {
            sqlstate,
            source: source.into(),
        }
    }

    pub fn sqlstate(&self) -> Option<&str> {
        match self {
            Self::Database { sqlstate, .. } => sqlstate.as_deref(),
            _ => None,
        }
    }

    /// True when the transaction was aborted by the database's conflict
    /// detection rather than by a broken statement.
    pub fn is_serialization_failure(&self) -> bool {
        matches!(
            self.sqlstate(),
            Some(SERIALIZATION_FAILURE) | Some(DEADLOCK_DETECTED)
        )
    }
}

/// Outcome of a failed use case.
#[derive(Error, Debug)]
pub enum TodoError {
    #[error("todo {id} not found")]
    NotFound { id: TodoId },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("unexpected store failure: {0}")]
    Unexpected(#[from] StoreError),
}

/// Result type alias for todoapp-core operations
pub type Result<T, E = TodoError> = std::result::Result<T, E>;
