//! Single-flight gate around session refreshes
//!
//! The first caller to enter becomes the leader and performs the refresh.
//! Callers entering while it is in flight queue up and are all released with
//! the leader's outcome. The in-flight flag is checked and set under one
//! synchronous lock, so no second refresh can start in between.

use super::credentials::CredentialError;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;

/// How a refresh ended, as seen by queued callers
#[derive(Debug, Clone)]
pub(crate) enum Settled {
    Refreshed,
    Failed(Arc<CredentialError>),
    Abandoned,
}

#[derive(Default)]
struct RefreshState {
    in_flight: bool,
    waiters: Vec<oneshot::Sender<Settled>>,
}

/// Result of trying to enter the gate
pub(crate) enum Entry<'a> {
    /// Perform the refresh, then settle the lease
    Leader(RefreshLease<'a>),
    /// Wait for the current leader
    Follower(oneshot::Receiver<Settled>),
}

#[derive(Default)]
pub(crate) struct RefreshGate {
    state: Mutex<RefreshState>,
}

impl RefreshGate {
    pub(crate) fn enter(&self) -> Entry<'_> {
        let mut state = self.lock();
        if state.in_flight {
            let (tx, rx) = oneshot::channel();
            state.waiters.push(tx);
            Entry::Follower(rx)
        } else {
            state.in_flight = true;
            Entry::Leader(RefreshLease {
                gate: self,
                settled: false,
            })
        }
    }

    #[cfg(test)]
    pub(crate) fn is_refreshing(&self) -> bool {
        self.lock().in_flight
    }

    /// Clear the flag and release every queued caller, in arrival order
    fn release(&self, outcome: &Settled) -> usize {
        let waiters = {
            let mut state = self.lock();
            state.in_flight = false;
            std::mem::take(&mut state.waiters)
        };
        let released = waiters.len();
        for waiter in waiters {
            // A waiter whose caller went away is simply skipped
            let _ = waiter.send(outcome.clone());
        }
        released
    }

    fn lock(&self) -> MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Held by the leader while its refresh is in flight
///
/// Dropping an unsettled lease (e.g. the leader's future was cancelled)
/// releases the queue with [`Settled::Abandoned`].
pub(crate) struct RefreshLease<'a> {
    gate: &'a RefreshGate,
    settled: bool,
}

impl RefreshLease<'_> {
    /// Returns how many queued callers were released
    pub(crate) fn settle(mut self, outcome: &Settled) -> usize {
        self.settled = true;
        self.gate.release(outcome)
    }
}

impl Drop for RefreshLease<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.gate.release(&Settled::Abandoned);
        }
    }
}

/// Wait for the leader's outcome
pub(crate) async fn wait(rx: oneshot::Receiver<Settled>) -> Settled {
    rx.await.unwrap_or(Settled::Abandoned)
}
