// src/gate.rs

//! Single-slot admission gate serializing command executions.
//!
//! At most one [`GatePermit`] exists at any instant. Waiting for the slot is
//! cancellation-aware: a caller whose request goes away stops waiting and is
//! rejected instead of piling up behind a slow command.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::trace;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateError {
    /// The cancellation signal fired before the slot became free.
    #[error("request cancelled while waiting for the command slot")]
    Rejected,
}

/// Capacity-1 execution gate. Cheap to clone; clones share the same slot.
#[derive(Debug, Clone)]
pub struct ExecutionGate {
    slot: Arc<Semaphore>,
}

/// Proof of holding the gate. The slot is freed when this is dropped.
#[derive(Debug)]
#[must_use = "dropping the permit immediately frees the gate"]
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
}

impl ExecutionGate {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Semaphore::new(1)),
        }
    }

    /// Take the slot, waiting until it is free or `cancel` fires.
    ///
    /// A free slot is granted immediately, even if `cancel` has already
    /// fired. Rejection never takes the slot.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<GatePermit, GateError> {
        tokio::select! {
            biased;

            permit = Arc::clone(&self.slot).acquire_owned() => {
                // The semaphore is never closed, so an error here can only
                // mean the gate is unusable; treat it like a rejection.
                let permit = permit.map_err(|_| GateError::Rejected)?;
                trace!("execution gate acquired");
                Ok(GatePermit { _permit: permit })
            }

            _ = cancel.cancelled() => {
                trace!("execution gate wait cancelled");
                Err(GateError::Rejected)
            }
        }
    }

    /// Take the slot only if it is free right now.
    pub fn try_acquire(&self) -> Option<GatePermit> {
        Arc::clone(&self.slot)
            .try_acquire_owned()
            .ok()
            .map(|permit| GatePermit { _permit: permit })
    }

    /// Whether nobody currently holds the slot.
    pub fn is_free(&self) -> bool {
        self.slot.available_permits() == 1
    }
}

impl Default for ExecutionGate {
    fn default() -> Self {
        Self::new()
    }
}

impl GatePermit {
    /// Free the slot, letting at most one waiter proceed.
    pub fn release(self) {
        trace!("execution gate released");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn free_slot_is_granted_immediately() {
        let gate = ExecutionGate::new();
        let cancel = CancellationToken::new();

        let permit = gate.acquire(&cancel).await.unwrap();
        assert!(!gate.is_free());

        permit.release();
        assert!(gate.is_free());
    }

    #[tokio::test]
    async fn free_slot_wins_over_already_fired_cancel() {
        let gate = ExecutionGate::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        assert!(gate.acquire(&cancel).await.is_ok());
    }

    #[tokio::test]
    async fn waiter_is_rejected_when_cancelled() {
        let gate = ExecutionGate::new();
        let held = gate.try_acquire().unwrap();

        let cancel = CancellationToken::new();
        let waiter = {
            let gate = gate.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { gate.acquire(&cancel).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();

        let res = waiter.await.unwrap();
        assert_eq!(res.unwrap_err(), GateError::Rejected);

        // Rejection must not have consumed the slot.
        drop(held);
        assert!(gate.is_free());
    }

    #[tokio::test]
    async fn waiter_proceeds_after_release() {
        let gate = ExecutionGate::new();
        let held = gate.try_acquire().unwrap();

        let waiter = {
            let gate = gate.clone();
            tokio::spawn(async move { gate.acquire(&CancellationToken::new()).await.is_ok() })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        held.release();
        assert!(waiter.await.unwrap());
        assert!(gate.is_free());
    }

    #[test]
    fn try_acquire_fails_while_held() {
        let gate = ExecutionGate::new();
        let _held = gate.try_acquire().unwrap();
        assert!(gate.try_acquire().is_none());
    }
}
