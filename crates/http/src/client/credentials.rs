//! Credential providers
//!
//! A provider answers two questions for the client: "is there a bearer token
//! to attach?" and "can the cookie session be renewed?". Requests that get no
//! token fall back to the ambient cookie session.

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a [`CredentialProvider`]
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The provider could not produce a token
    #[error("Token unavailable: {0}")]
    Token(String),

    /// The refresh endpoint answered with a non-success status
    #[error("Session refresh rejected with status {status}")]
    Rejected { status: u16 },

    /// The refresh request never completed
    #[error("Session refresh request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// This provider has no way to refresh a session
    #[error("Session refresh is not supported: {0}")]
    Unsupported(String),
}

/// Source of credentials for authenticated requests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Current bearer token, or `None` to use the cookie session instead
    async fn token(&self, force_refresh: bool) -> Result<Option<String>, CredentialError>;

    /// Renew the cookie session
    async fn refresh_session(&self) -> Result<(), CredentialError>;
}

/// Cookie-session credentials renewed through a refresh endpoint
///
/// Never hands out a bearer token. The [`reqwest::Client`] must be the one the
/// API client sends with so both share the cookie jar.
#[derive(Clone)]
pub struct SessionEndpoint {
    http: reqwest::Client,
    refresh_url: String,
}

impl SessionEndpoint {
    pub fn new(http: reqwest::Client, refresh_url: impl Into<String>) -> Self {
        Self {
            http,
            refresh_url: refresh_url.into(),
        }
    }

    pub fn refresh_url(&self) -> &str {
        &self.refresh_url
    }
}

#[async_trait]
impl CredentialProvider for SessionEndpoint {
    async fn token(&self, _force_refresh: bool) -> Result<Option<String>, CredentialError> {
        Ok(None)
    }

    async fn refresh_session(&self) -> Result<(), CredentialError> {
        let request = self.http.post(&self.refresh_url);
        #[cfg(target_arch = "wasm32")]
        let request = request.fetch_credentials_include();

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(CredentialError::Rejected {
                status: status.as_u16(),
            })
        }
    }
}

/// A fixed bearer token, e.g. an API key issued out of band
#[derive(Clone)]
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticToken").field("token", &"<redacted>").finish()
    }
}

#[async_trait]
impl CredentialProvider for StaticToken {
    async fn token(&self, _force_refresh: bool) -> Result<Option<String>, CredentialError> {
        Ok(Some(self.token.clone()))
    }

    async fn refresh_session(&self) -> Result<(), CredentialError> {
        Err(CredentialError::Unsupported(
            "static tokens cannot renew a session".to_string(),
        ))
    }
}
