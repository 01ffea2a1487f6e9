//! Repository implementations for database access
//!
//! Repositories implement the `todoapp-core` store traits on the
//! transaction scope; they never begin, commit or roll back.

pub mod todos;

pub use todos::TodoRow;
