//! Todo entity

use std::fmt;

use crate::validation::TodoText;

/// Store-assigned todo identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TodoId(i32);

impl TodoId {
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A persisted todo.
///
/// `index` is the zero-based position in the list. Across all committed
/// todos the indices are exactly `0..count`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    pub done: bool,
    pub index: i32,
}

impl Todo {
    /// Apply supplied changes. `id` and `index` are never touched.
    pub fn with_changes(mut self, text: Option<TodoText>, done: Option<bool>) -> Self {
        if let Some(text) = text {
            self.text = text.into_string();
        }
        if let Some(done) = done {
            self.done = done;
        }
        self
    }
}

/// A todo that has not been inserted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub text: TodoText,
    pub done: bool,
    pub index: i32,
}

impl NewTodo {
    /// Open todo placed at the tail of a list holding `count` items.
    pub fn append(text: TodoText, count: i32) -> Self {
        Self {
            text,
            done: false,
            index: count,
        }
    }

    pub fn into_todo(self, id: TodoId) -> Todo {
        Todo {
            id,
            text: self.text.into_string(),
            done: self.done,
            index: self.index,
        }
    }
}

/// Partial update; `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub text: Option<String>,
    pub done: Option<bool>,
}

impl TodoPatch {
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn done(mut self, done: bool) -> Self {
        self.done = Some(done);
        self
    }
}
