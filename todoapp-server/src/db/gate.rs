//! Gated connection checkout
//!
//! Wraps the pool so that checkouts go through a shared [`AcquireGate`]:
//! one checkout in flight at a time, FIFO, independent of
//! `max_connections`. Every runner over the same database must be handed
//! the same gate; `main` creates exactly one for the process.

use std::sync::Arc;

use sqlx::{PgPool, Postgres, Transaction};
use todoapp_core::{AcquireGate, StoreError};

use super::store_error;

#[derive(Debug, Clone)]
pub struct ConnectionGate {
    pool: PgPool,
    gate: Arc<AcquireGate>,
}

impl ConnectionGate {
    pub fn new(pool: PgPool, gate: Arc<AcquireGate>) -> Self {
        Self { pool, gate }
    }

    /// Check out a connection and open a transaction on it.
    ///
    /// The gate slot covers the checkout and the `BEGIN` round trip. The
    /// returned handle owns the connection; dropping it unfinished rolls
    /// back before the connection is reused. A checkout that times out
    /// fails with [`StoreError::ResourceExhausted`].
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, StoreError> {
        self.gate
            .admit(self.pool.begin())
            .await
            .map_err(store_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn checkout_waits_on_the_shared_gate() {
        // Lazy pool: nothing connects unless a checkout is admitted.
        let pool = PgPool::connect_lazy("postgres://localhost/todoapp").unwrap();
        let shared = Arc::new(AcquireGate::new());
        let gate = ConnectionGate::new(pool, Arc::clone(&shared));

        let (release, hold) = oneshot::channel::<()>();
        let busy = tokio::spawn({
            let shared = Arc::clone(&shared);
            async move {
                shared
                    .admit(async {
                        let _ = hold.await;
                    })
                    .await
            }
        });
        while shared.is_idle() {
            tokio::task::yield_now().await;
        }

        let blocked = tokio::time::timeout(Duration::from_millis(50), gate.begin()).await;
        assert!(blocked.is_err(), "checkout must queue behind the other holder");

        release.send(()).unwrap();
        busy.await.unwrap();
        assert!(shared.is_idle());
    }
}
