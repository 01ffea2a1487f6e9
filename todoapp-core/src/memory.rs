//! In-memory backend
//!
//! Transactions are serialized behind one async mutex, which makes every
//! isolation level behave as SERIALIZABLE. Work runs against a private copy
//! of the rows that is published only on commit, so a rolled-back
//! transaction leaves nothing behind. The commit check mirrors the schema
//! constraints of the PostgreSQL backend (unique, non-negative `index`).

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::gate::AcquireGate;
use crate::store::{AccessMode, Isolation, TodoStore, Transactional};
use crate::todo::{NewTodo, Todo, TodoId};

const UNIQUE_VIOLATION: &str = "23505";
const CHECK_VIOLATION: &str = "23514";

/// How a transaction ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Committed,
    RolledBack,
}

/// One finished transaction, kept for inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionRecord {
    pub isolation: Isolation,
    pub access: AccessMode,
    pub outcome: Outcome,
}

#[derive(Debug)]
struct MemoryState {
    rows: BTreeMap<TodoId, Todo>,
    next_id: i32,
    history: Vec<TransactionRecord>,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
            history: Vec::new(),
        }
    }
}

/// Shared in-memory database. Clones share the same rows.
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    state: Arc<Mutex<MemoryState>>,
    gate: Arc<AcquireGate>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed todos ordered by `index`.
    pub async fn snapshot(&self) -> Vec<Todo> {
        let state = self.state.lock().await;
        ordered(state.rows.values().cloned())
    }

    /// Every finished transaction, oldest first.
    pub async fn history(&self) -> Vec<TransactionRecord> {
        self.state.lock().await.history.clone()
    }
}

/// Transaction handle for [`MemoryDatabase`].
#[derive(Debug)]
pub struct MemoryScope {
    rows: BTreeMap<TodoId, Todo>,
    next_id: i32,
    access: AccessMode,
}

impl MemoryScope {
    fn writable(&self) -> Result<(), StoreError> {
        if self.access.is_read_only() {
            return Err(StoreError::ReadOnly);
        }
        Ok(())
    }

    /// Constraint check run at commit.
    fn check_constraints(&self) -> Result<(), StoreError> {
        let mut seen = HashSet::with_capacity(self.rows.len());
        for todo in self.rows.values() {
            if todo.index < 0 {
                return Err(constraint_violation(CHECK_VIOLATION, todo));
            }
            if !seen.insert(todo.index) {
                return Err(constraint_violation(UNIQUE_VIOLATION, todo));
            }
        }
        Ok(())
    }
}

fn constraint_violation(sqlstate: &str, todo: &Todo) -> StoreError {
    StoreError::database(
        format!("index {} of todo {} violates a constraint", todo.index, todo.id),
        Some(sqlstate.to_owned()),
    )
}

fn ordered(todos: impl Iterator<Item = Todo>) -> Vec<Todo> {
    let mut todos: Vec<Todo> = todos.collect();
    todos.sort_by_key(|t| t.index);
    todos
}

#[async_trait]
impl TodoStore for MemoryScope {
    async fn count(&mut self) -> Result<i32, StoreError> {
        Ok(self.rows.len() as i32)
    }

    async fn select_all(&mut self) -> Result<Vec<Todo>, StoreError> {
        Ok(ordered(self.rows.values().cloned()))
    }

    async fn select_by_id(&mut self, id: TodoId) -> Result<Option<Todo>, StoreError> {
        Ok(self.rows.get(&id).cloned())
    }

    async fn insert(&mut self, todo: &NewTodo) -> Result<TodoId, StoreError> {
        self.writable()?;
        let id = TodoId::new(self.next_id);
        self.next_id += 1;
        self.rows.insert(id, todo.clone().into_todo(id));
        Ok(id)
    }

    async fn update_one(&mut self, todo: &Todo) -> Result<(), StoreError> {
        self.writable()?;
        if let Some(row) = self.rows.get_mut(&todo.id) {
            row.text.clone_from(&todo.text);
            row.done = todo.done;
            row.index = todo.index;
        }
        Ok(())
    }

    async fn update_many(&mut self, todos: &[Todo]) -> Result<(), StoreError> {
        for todo in todos {
            self.update_one(todo).await?;
        }
        Ok(())
    }

    async fn delete_by_id(&mut self, id: TodoId) -> Result<(), StoreError> {
        self.writable()?;
        self.rows.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl Transactional for MemoryDatabase {
    type Scope = MemoryScope;

    async fn run<T, E, F>(&self, isolation: Isolation, access: AccessMode, work: F) -> Result<T, E>
    where
        T: Send + 'static,
        E: From<StoreError> + Send + 'static,
        F: for<'s> FnOnce(&'s mut Self::Scope) -> BoxFuture<'s, Result<T, E>> + Send + 'static,
    {
        let mut state = self.gate.admit(Arc::clone(&self.state).lock_owned()).await;
        let mut scope = MemoryScope {
            rows: state.rows.clone(),
            next_id: state.next_id,
            access,
        };

        let result = match work(&mut scope).await {
            Ok(value) => scope.check_constraints().map(|()| value).map_err(E::from),
            Err(err) => Err(err),
        };

        let outcome = if result.is_ok() {
            state.rows = scope.rows;
            state.next_id = scope.next_id;
            Outcome::Committed
        } else {
            Outcome::RolledBack
        };
        state.history.push(TransactionRecord {
            isolation,
            access,
            outcome,
        });
        tracing::trace!(?isolation, ?access, ?outcome, "memory transaction finished");

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::TodoText;

    fn new_todo(text: &str, index: i32) -> NewTodo {
        NewTodo::append(TodoText::new(text).unwrap(), index)
    }

    #[tokio::test]
    async fn commit_publishes_rows() {
        let db = MemoryDatabase::new();
        let id = db
            .run(Isolation::Serializable, AccessMode::ReadWrite, |tx| {
                Box::pin(async move { tx.insert(&new_todo("Buy milk", 0)).await })
            })
            .await
            .unwrap();

        assert_eq!(id, TodoId::new(1));
        let rows = db.snapshot().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text, "Buy milk");
        assert_eq!(db.history().await[0].outcome, Outcome::Committed);
    }

    #[tokio::test]
    async fn error_rolls_back_every_write() {
        let db = MemoryDatabase::new();
        let result: Result<(), StoreError> = db
            .run(Isolation::Serializable, AccessMode::ReadWrite, |tx| {
                Box::pin(async move {
                    tx.insert(&new_todo("Buy milk", 0)).await?;
                    Err(StoreError::ResourceExhausted)
                })
            })
            .await;

        assert!(matches!(result, Err(StoreError::ResourceExhausted)));
        assert!(db.snapshot().await.is_empty());
        assert_eq!(db.history().await[0].outcome, Outcome::RolledBack);
    }

    #[tokio::test]
    async fn read_only_rejects_writes() {
        let db = MemoryDatabase::new();
        let result = db
            .run(Isolation::RepeatableRead, AccessMode::ReadOnly, |tx| {
                Box::pin(async move { tx.insert(&new_todo("Buy milk", 0)).await })
            })
            .await;

        assert!(matches!(result, Err(StoreError::ReadOnly)));
        assert!(db.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn duplicate_index_fails_at_commit() {
        let db = MemoryDatabase::new();
        let result = db
            .run(Isolation::Serializable, AccessMode::ReadWrite, |tx| {
                Box::pin(async move {
                    tx.insert(&new_todo("Buy milk", 0)).await?;
                    tx.insert(&new_todo("Buy bread", 0)).await
                })
            })
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.sqlstate(), Some(UNIQUE_VIOLATION));
        assert!(db.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn update_and_delete_by_id() {
        let db = MemoryDatabase::new();
        let count = db
            .run(Isolation::Serializable, AccessMode::ReadWrite, |tx| {
                Box::pin(async move {
                    let first = tx.insert(&new_todo("Buy milk", 0)).await?;
                    let second = tx.insert(&new_todo("Buy bread", 1)).await?;
                    tx.delete_by_id(first).await?;
                    tx.update_one(&Todo {
                        id: second,
                        text: "Buy rye bread".into(),
                        done: true,
                        index: 0,
                    })
                    .await?;
                    // An UPDATE matching no row is not an error.
                    tx.update_one(&Todo {
                        id: first,
                        text: "gone".into(),
                        done: false,
                        index: 5,
                    })
                    .await?;
                    tx.update_many(&[]).await?;
                    tx.count().await
                })
            })
            .await
            .unwrap();
        assert_eq!(count, 1);

        let rows = db.snapshot().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, TodoId::new(2));
        assert_eq!(rows[0].text, "Buy rye bread");
        assert!(rows[0].done);
        assert_eq!(rows[0].index, 0);
    }

    #[tokio::test]
    async fn ids_are_never_reused() {
        let db = MemoryDatabase::new();
        for expected in 1..=3 {
            let id: TodoId = db
                .run(Isolation::Serializable, AccessMode::ReadWrite, |tx| {
                    Box::pin(async move {
                        let id = tx.insert(&new_todo("Buy milk", 0)).await?;
                        tx.delete_by_id(id).await?;
                        Ok::<_, StoreError>(id)
                    })
                })
                .await
                .unwrap();
            assert_eq!(id.get(), expected);
        }
    }
}
