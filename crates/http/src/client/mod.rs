//! Travelog API client

mod calls;
mod coordinator;
pub mod credentials;
pub mod descriptor;
pub mod error;
pub mod posts;
mod refresh;
pub mod response;
pub mod signals;

use credentials::{CredentialProvider, SessionEndpoint};
pub use error::ClientError;
use refresh::RefreshGate;
use reqwest::{Client, ClientBuilder};
use signals::AuthSignals;
use std::sync::Arc;
use std::time::Duration;
use travelog_core::{ClientSettings, DEFAULT_REFRESH_PATH};

/// Travelog API client
///
/// Cheap to clone; clones share the connection pool, cookie jar, refresh
/// state and failure channel.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
    signals: AuthSignals,
    refresh: RefreshGate,
}

impl ApiClient {
    /// Create a new client with default configuration
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Channel reporting unrecoverable authentication failures
    pub fn signals(&self) -> &AuthSignals {
        &self.inner.signals
    }

    #[cfg(test)]
    pub(crate) fn is_refreshing(&self) -> bool {
        self.inner.refresh.is_refreshing()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url, path)
    }
}

/// Builder for ApiClient
#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    session_refresh_path: Option<String>,
    credentials: Option<Arc<dyn CredentialProvider>>,
    signals: Option<AuthSignals>,
}

impl ApiClientBuilder {
    /// Start from loaded settings
    pub fn from_settings(settings: &ClientSettings) -> Self {
        let mut builder = Self::default()
            .base_url(settings.base_url.clone())
            .user_agent(settings.user_agent.clone())
            .session_refresh_path(settings.session_refresh_path.clone());
        if let Some(timeout) = settings.timeout() {
            builder = builder.timeout(timeout);
        }
        builder
    }

    /// Set the base URL
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Path of the cookie-session refresh endpoint, used when no custom
    /// credential provider is set
    #[must_use]
    pub fn session_refresh_path(mut self, path: impl Into<String>) -> Self {
        self.session_refresh_path = Some(path.into());
        self
    }

    /// Use a custom credential provider instead of the session endpoint
    #[must_use]
    pub fn credentials(mut self, provider: Arc<dyn CredentialProvider>) -> Self {
        self.credentials = Some(provider);
        self
    }

    /// Share an existing failure channel
    #[must_use]
    pub fn signals(mut self, signals: AuthSignals) -> Self {
        self.signals = Some(signals);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ApiClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        let mut client_builder = ClientBuilder::new();

        #[cfg(not(target_arch = "wasm32"))]
        {
            client_builder = client_builder.cookie_store(true);
            if let Some(timeout) = self.timeout {
                client_builder = client_builder.timeout(timeout);
            }
        }

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("travelog-client/{}", env!("CARGO_PKG_VERSION")));
        client_builder = client_builder.user_agent(user_agent);

        let http = client_builder.build()?;

        let credentials = self.credentials.unwrap_or_else(|| {
            let path = self
                .session_refresh_path
                .as_deref()
                .unwrap_or(DEFAULT_REFRESH_PATH);
            Arc::new(SessionEndpoint::new(
                http.clone(),
                format!("{base_url}{path}"),
            ))
        });

        Ok(ApiClient {
            inner: Arc::new(Inner {
                http,
                base_url,
                credentials,
                signals: self.signals.unwrap_or_default(),
                refresh: RefreshGate::default(),
            }),
        })
    }
}
