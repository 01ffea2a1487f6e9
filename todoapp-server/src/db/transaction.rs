//! PostgreSQL transaction runner
//!
//! `PgTransactional::run` checks out a connection through the gate, opens
//! a transaction, applies `SET TRANSACTION ISOLATION LEVEL .., READ ONLY |
//! READ WRITE` as its first statement, hands the work a
//! [`PgTransactionScope`], then commits on `Ok` or rolls back on `Err`.
//! If the run future is dropped part-way (request timeout), sqlx rolls the
//! transaction back before the connection goes back into the pool.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use sqlx::{Executor, PgConnection, PgPool, Postgres, Transaction};
use todoapp_core::{AccessMode, AcquireGate, Isolation, StoreError, Transactional};
use tracing::{debug, warn};

use super::gate::ConnectionGate;
use super::store_error;

/// Transaction handle. Only [`PgTransactional`] can create one, so store
/// primitives cannot be called outside a transaction.
pub struct PgTransactionScope {
    tx: Transaction<'static, Postgres>,
}

impl PgTransactionScope {
    pub(crate) fn conn(&mut self) -> &mut PgConnection {
        &mut self.tx
    }
}

/// Transaction runner over a gated PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgTransactional {
    gate: ConnectionGate,
}

impl PgTransactional {
    /// Runner over `pool`. Runners sharing a database must share `gate`.
    pub fn new(pool: PgPool, gate: Arc<AcquireGate>) -> Self {
        Self {
            gate: ConnectionGate::new(pool, gate),
        }
    }
}

fn set_transaction_statement(isolation: Isolation, access: AccessMode) -> String {
    format!(
        "SET TRANSACTION ISOLATION LEVEL {}, {}",
        isolation.as_sql(),
        access.as_sql()
    )
}

#[async_trait]
impl Transactional for PgTransactional {
    type Scope = PgTransactionScope;

    async fn run<T, E, F>(&self, isolation: Isolation, access: AccessMode, work: F) -> Result<T, E>
    where
        T: Send + 'static,
        E: From<StoreError> + Send + 'static,
        F: for<'s> FnOnce(&'s mut Self::Scope) -> BoxFuture<'s, Result<T, E>> + Send + 'static,
    {
        let mut tx = self.gate.begin().await?;
        let statement = set_transaction_statement(isolation, access);
        (&mut *tx)
            .execute(statement.as_str())
            .await
            .map_err(store_error)?;
        debug!(?isolation, ?access, "transaction started");

        let mut scope = PgTransactionScope { tx };
        match work(&mut scope).await {
            Ok(value) => {
                scope.tx.commit().await.map_err(store_error)?;
                debug!("transaction committed");
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback) = scope.tx.rollback().await {
                    warn!(error = %rollback, "rollback failed");
                } else {
                    debug!("transaction rolled back");
                }
                Err(err)
            }
        }
    }
}
