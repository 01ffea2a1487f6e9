//! Connection acquisition gate
//!
//! Only one checkout may be in flight at a time across the whole process,
//! whatever the pool size. Waiters queue in arrival order (tokio's
//! semaphore is fair). The slot is held while the checkout runs and is
//! released as soon as it resolves; it does not track connection lifetime.

use std::future::Future;

use tokio::sync::Semaphore;

#[derive(Debug)]
pub struct AcquireGate {
    slot: Semaphore,
}

impl AcquireGate {
    pub fn new() -> Self {
        Self {
            slot: Semaphore::new(1),
        }
    }

    /// Run `acquire` once every earlier caller has finished theirs.
    pub async fn admit<F>(&self, acquire: F) -> F::Output
    where
        F: Future,
    {
        // The semaphore is never closed, so this only waits.
        let _permit = self.slot.acquire().await.ok();
        acquire.await
    }

    /// No checkout is currently running.
    pub fn is_idle(&self) -> bool {
        self.slot.available_permits() == 1
    }
}

impl Default for AcquireGate {
    fn default() -> Self {
        Self::new()
    }
}
