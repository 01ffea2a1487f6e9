//! Database layer - pool, gate, transactions, repository
//!
//! # Design Principles
//!
//! - One connection checkout in flight at a time (`ConnectionGate`)
//! - Every store access happens inside a transaction opened by
//!   `PgTransactional`, never on the bare pool
//! - Isolation level and access mode are set before any work runs
//! - Rely on DB constraints as a backstop for the position invariant

pub mod gate;
pub mod migrations;
pub mod pool;
pub mod repos;
pub mod transaction;

pub use gate::ConnectionGate;
pub use pool::{create_pool, PoolSettings};
pub use transaction::{PgTransactionScope, PgTransactional};

use todoapp_core::StoreError;

/// Map a sqlx failure onto the store error taxonomy.
///
/// A pool checkout timeout means the pool is exhausted; anything else keeps
/// its SQLSTATE so conflicts can be told apart from broken statements.
pub fn store_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolTimedOut => StoreError::ResourceExhausted,
        other => {
            let sqlstate = other
                .as_database_error()
                .and_then(|e| e.code())
                .map(|code| code.into_owned());
            StoreError::database(other, sqlstate)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_timeout_is_exhaustion() {
        assert!(matches!(
            store_error(sqlx::Error::PoolTimedOut),
            StoreError::ResourceExhausted
        ));
    }

    #[test]
    fn other_errors_keep_their_source() {
        let err = store_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Database { sqlstate: None, .. }));
        assert!(err.to_string().contains("no rows returned"));
    }
}
