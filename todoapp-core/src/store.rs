//! Transaction and store seams
//!
//! A backend provides two things: a [`Transactional`] runner that opens a
//! transaction and hands the unit of work a scope handle, and the
//! [`TodoStore`] primitives implemented on that handle. Primitives never
//! commit or roll back; only the runner does. Because the handle is only
//! ever created by the runner, no primitive can run outside a transaction.

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::StoreError;
use crate::todo::{NewTodo, Todo, TodoId};

/// Transaction isolation level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Isolation {
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl Isolation {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::ReadCommitted => "READ COMMITTED",
            Self::RepeatableRead => "REPEATABLE READ",
            Self::Serializable => "SERIALIZABLE",
        }
    }
}

/// Transaction access mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    ReadOnly,
    ReadWrite,
}

impl AccessMode {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::ReadOnly => "READ ONLY",
            Self::ReadWrite => "READ WRITE",
        }
    }

    pub fn is_read_only(self) -> bool {
        self == Self::ReadOnly
    }
}

/// Ordered store primitives, each one logical access inside an open
/// transaction.
#[async_trait]
pub trait TodoStore: Send {
    /// Number of existing todos.
    async fn count(&mut self) -> Result<i32, StoreError>;

    /// All todos ordered by `index` ascending.
    async fn select_all(&mut self) -> Result<Vec<Todo>, StoreError>;

    async fn select_by_id(&mut self, id: TodoId) -> Result<Option<Todo>, StoreError>;

    /// Persist a new row and return the generated id.
    async fn insert(&mut self, todo: &NewTodo) -> Result<TodoId, StoreError>;

    /// Overwrite `text`, `done` and `index` of the row with `todo.id`.
    async fn update_one(&mut self, todo: &Todo) -> Result<(), StoreError>;

    /// `update_one` for every element. No-op on an empty slice.
    async fn update_many(&mut self, todos: &[Todo]) -> Result<(), StoreError>;

    async fn delete_by_id(&mut self, id: TodoId) -> Result<(), StoreError>;
}

/// Transaction runner.
///
/// `run` opens a transaction at `isolation`/`access`, invokes `work` exactly
/// once with the scope handle, commits when it returns `Ok` and rolls back
/// when it returns `Err`. The error is handed back unchanged; a failure to
/// begin or commit is converted from [`StoreError`]. Nothing is retried.
#[async_trait]
pub trait Transactional: Send + Sync {
    type Scope: TodoStore;

    async fn run<T, E, F>(&self, isolation: Isolation, access: AccessMode, work: F) -> Result<T, E>
    where
        T: Send + 'static,
        E: From<StoreError> + Send + 'static,
        F: for<'s> FnOnce(&'s mut Self::Scope) -> BoxFuture<'s, Result<T, E>> + Send + 'static;
}
