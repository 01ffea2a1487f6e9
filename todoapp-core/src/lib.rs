//! todoapp-core: ordered todo store
//!
//! Domain model, the transaction/store seams, and the four use cases that
//! keep todo positions contiguous:
//!
//! - [`gate::AcquireGate`] serializes connection checkout
//! - [`store::Transactional`] runs a unit of work in one transaction
//! - [`store::TodoStore`] is the set of primitives available inside it
//! - [`service::TodoService`] composes them into create/list/update/delete
//!
//! Backends live elsewhere (`todoapp-server` for PostgreSQL); an in-memory
//! backend ships here in [`memory`].

pub mod error;
pub mod gate;
pub mod memory;
pub mod service;
pub mod store;
pub mod todo;
pub mod validation;

pub use error::{Result, StoreError, TodoError};
pub use gate::AcquireGate;
pub use memory::MemoryDatabase;
pub use service::TodoService;
pub use store::{AccessMode, Isolation, TodoStore, Transactional};
pub use todo::{NewTodo, Todo, TodoId, TodoPatch};
pub use validation::{TodoText, ValidationError};
