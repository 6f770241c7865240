//! Shared helpers for client integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use travelog_http::{CredentialError, CredentialProvider};

/// Cookie-session credentials that count calls and refresh after a delay
pub struct SessionOnly {
    token_lookups: AtomicUsize,
    refreshes: AtomicUsize,
    delay: Duration,
    reject_with: Option<u16>,
}

impl SessionOnly {
    pub fn succeeding(delay: Duration) -> Arc<Self> {
        Arc::new(Self::new_inner(delay))
    }

    pub fn failing(delay: Duration, status: u16) -> Arc<Self> {
        Arc::new(Self {
            reject_with: Some(status),
            ..Self::new_inner(delay)
        })
    }

    fn new_inner(delay: Duration) -> Self {
        Self {
            token_lookups: AtomicUsize::new(0),
            refreshes: AtomicUsize::new(0),
            delay,
            reject_with: None,
        }
    }

    pub fn token_lookups(&self) -> usize {
        self.token_lookups.load(Ordering::SeqCst)
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialProvider for SessionOnly {
    async fn token(&self, _force_refresh: bool) -> Result<Option<String>, CredentialError> {
        self.token_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }

    async fn refresh_session(&self) -> Result<(), CredentialError> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        match self.reject_with {
            Some(status) => Err(CredentialError::Rejected { status }),
            None => Ok(()),
        }
    }
}

/// An address nothing is listening on
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
