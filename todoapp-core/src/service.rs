//! Todo use cases
//!
//! Each operation runs inside exactly one transaction and holds no state
//! between calls. Mutations run SERIALIZABLE: they read derived state (the
//! count, the tail) and write from it, so two concurrent mutations acting on
//! the same snapshot must not both commit. Conflicts are not retried; they
//! reach the caller as [`TodoError::Unexpected`].

use tracing::{debug, info};

use crate::error::{Result, TodoError};
use crate::store::{AccessMode, Isolation, TodoStore, Transactional};
use crate::todo::{NewTodo, Todo, TodoId, TodoPatch};
use crate::validation::TodoText;

#[derive(Debug, Clone)]
pub struct TodoService<D> {
    db: D,
}

impl<D> TodoService<D>
where
    D: Transactional,
{
    pub fn new(db: D) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &D {
        &self.db
    }

    /// Append a todo at the tail of the list.
    #[tracing::instrument(skip_all)]
    pub async fn create(&self, text: &str) -> Result<Todo> {
        let text = TodoText::new(text)?;

        let todo = self
            .db
            .run(Isolation::Serializable, AccessMode::ReadWrite, move |tx| {
                Box::pin(async move {
                    let count = tx.count().await?;
                    let new = NewTodo::append(text, count);
                    let id = tx.insert(&new).await?;
                    Ok::<_, TodoError>(new.into_todo(id))
                })
            })
            .await?;

        info!(id = %todo.id, index = todo.index, "todo created");
        Ok(todo)
    }

    /// All todos in list order.
    #[tracing::instrument(skip_all)]
    pub async fn list(&self) -> Result<Vec<Todo>> {
        let todos = self
            .db
            .run(Isolation::RepeatableRead, AccessMode::ReadOnly, |tx| {
                Box::pin(async move { Ok::<_, TodoError>(tx.select_all().await?) })
            })
            .await?;

        debug!(count = todos.len(), "todos listed");
        Ok(todos)
    }

    /// Change text and/or completion. Position and id never change.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update(&self, id: TodoId, patch: TodoPatch) -> Result<Todo> {
        let text = patch.text.as_deref().map(TodoText::new).transpose()?;
        let done = patch.done;

        let todo = self
            .db
            .run(Isolation::Serializable, AccessMode::ReadWrite, move |tx| {
                Box::pin(async move {
                    let current = tx
                        .select_by_id(id)
                        .await?
                        .ok_or(TodoError::NotFound { id })?;
                    let updated = current.with_changes(text, done);
                    tx.update_one(&updated).await?;
                    Ok::<_, TodoError>(updated)
                })
            })
            .await?;

        info!(done = todo.done, "todo updated");
        Ok(todo)
    }

    /// Remove a todo and close the gap it leaves. Deleting an id that does
    /// not exist succeeds without touching anything.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: TodoId) -> Result<()> {
        let removed = self
            .db
            .run(Isolation::Serializable, AccessMode::ReadWrite, move |tx| {
                Box::pin(async move {
                    let Some(target) = tx.select_by_id(id).await? else {
                        return Ok::<_, TodoError>(None);
                    };
                    tx.delete_by_id(target.id).await?;

                    let tail = close_gap(tx.select_all().await?, target.index);
                    tx.update_many(&tail).await?;
                    Ok(Some((target.index, tail.len())))
                })
            })
            .await?;

        match removed {
            Some((index, shifted)) => info!(index, shifted, "todo deleted"),
            None => debug!("todo absent, nothing deleted"),
        }
        Ok(())
    }
}

/// Every todo positioned after `removed_index`, moved one place down.
///
/// The store has no "shift everything above X" primitive, so the gap is
/// closed by rewriting the whole tail as point updates.
fn close_gap(todos: Vec<Todo>, removed_index: i32) -> Vec<Todo> {
    todos
        .into_iter()
        .filter(|todo| todo.index > removed_index)
        .map(|mut todo| {
            todo.index -= 1;
            todo
        })
        .collect()
}
