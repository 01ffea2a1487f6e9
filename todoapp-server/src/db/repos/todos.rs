//! Todo repository
//!
//! One statement per primitive. `index` is quoted everywhere since it is a
//! keyword in several SQL dialects.

use async_trait::async_trait;
use sqlx::FromRow;
use todoapp_core::{NewTodo, StoreError, Todo, TodoId, TodoStore};

use crate::db::store_error;
use crate::db::transaction::PgTransactionScope;

/// Todo record from database
#[derive(Debug, Clone, FromRow)]
pub struct TodoRow {
    pub id: i32,
    pub text: String,
    pub done: bool,
    pub index: i32,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Self {
            id: TodoId::new(row.id),
            text: row.text,
            done: row.done,
            index: row.index,
        }
    }
}

const UPDATE_TODO: &str = r#"
    UPDATE todo
    SET text = $1, done = $2, "index" = $3
    WHERE id = $4
"#;

#[async_trait]
impl TodoStore for PgTransactionScope {
    async fn count(&mut self) -> Result<i32, StoreError> {
        sqlx::query_scalar::<_, i32>("SELECT count(*)::int FROM todo")
            .fetch_one(self.conn())
            .await
            .map_err(store_error)
    }

    async fn select_all(&mut self) -> Result<Vec<Todo>, StoreError> {
        let rows: Vec<TodoRow> = sqlx::query_as(
            r#"
            SELECT id, text, done, "index"
            FROM todo
            ORDER BY "index"
            "#,
        )
        .fetch_all(self.conn())
        .await
        .map_err(store_error)?;

        Ok(rows.into_iter().map(Todo::from).collect())
    }

    async fn select_by_id(&mut self, id: TodoId) -> Result<Option<Todo>, StoreError> {
        let row: Option<TodoRow> = sqlx::query_as(
            r#"
            SELECT id, text, done, "index"
            FROM todo
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(self.conn())
        .await
        .map_err(store_error)?;

        Ok(row.map(Todo::from))
    }

    async fn insert(&mut self, todo: &NewTodo) -> Result<TodoId, StoreError> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO todo (text, done, "index")
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(todo.text.as_str())
        .bind(todo.done)
        .bind(todo.index)
        .fetch_one(self.conn())
        .await
        .map_err(store_error)?;

        Ok(TodoId::new(id))
    }

    async fn update_one(&mut self, todo: &Todo) -> Result<(), StoreError> {
        sqlx::query(UPDATE_TODO)
            .bind(todo.text.as_str())
            .bind(todo.done)
            .bind(todo.index)
            .bind(todo.id.get())
            .execute(self.conn())
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn update_many(&mut self, todos: &[Todo]) -> Result<(), StoreError> {
        // Same prepared statement for every row; sqlx caches it per connection.
        for todo in todos {
            self.update_one(todo).await?;
        }
        Ok(())
    }

    async fn delete_by_id(&mut self, id: TodoId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM todo WHERE id = $1")
            .bind(id.get())
            .execute(self.conn())
            .await
            .map_err(store_error)?;
        Ok(())
    }
}
