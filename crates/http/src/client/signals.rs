//! Authentication failure notifications
//!
//! Whoever owns the UI state (e.g. to force a logout or show a re-auth prompt)
//! subscribes here instead of listening for ambient global events.

use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 16;

/// Why an authentication episode ended unrecoverably
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    /// The server rejected the bearer token
    BearerRejected { path: String },
    /// Renewing the cookie session failed
    RefreshFailed { message: String },
    /// An authenticated request never reached the server
    Transport { path: String, message: String },
}

/// Fan-out channel for [`AuthFailure`] events
///
/// Clones share the same channel. Events sent while nobody is subscribed are
/// dropped.
#[derive(Clone, Debug)]
pub struct AuthSignals {
    sender: broadcast::Sender<AuthFailure>,
}

impl AuthSignals {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Receive every failure broadcast from now on
    pub fn subscribe(&self) -> broadcast::Receiver<AuthFailure> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub(crate) fn broadcast(&self, failure: AuthFailure) {
        warn!(?failure, "Authentication failed");
        // No subscribers is fine
        let _ = self.sender.send(failure);
    }
}

impl Default for AuthSignals {
    fn default() -> Self {
        Self::new()
    }
}
