//! Request execution with transparent session recovery
//!
//! A 401 on a cookie-session request triggers one shared refresh followed by a
//! single replay. A 401 on a bearer request is final. Every unrecoverable
//! episode is reported once on [`AuthSignals`](super::signals::AuthSignals).

use super::descriptor::{RequestBody, RequestDescriptor};
use super::refresh::{self, Entry, Settled};
use super::response::{finish, read_failure};
use super::signals::AuthFailure;
use super::{ApiClient, ClientError};
use reqwest::{RequestBuilder, Response, StatusCode, header, multipart::Form};
use serde_json::Value;
use std::sync::Arc;
use travelog_core::IdempotencyKey;

/// Which credential a request went out with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CredentialMode {
    Anonymous,
    Bearer,
    Session,
}

impl ApiClient {
    /// Send a request, attaching credentials and recovering from an expired
    /// cookie session
    ///
    /// Returns the parsed JSON body, or `{"success": true}` when the response
    /// is not JSON.
    #[tracing::instrument(
        skip_all,
        fields(method = %descriptor.method(), path = descriptor.path())
    )]
    pub async fn execute(&self, descriptor: &RequestDescriptor) -> Result<Value, ClientError> {
        let (response, mode) = self.dispatch(descriptor).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return finish(response).await;
        }

        match mode {
            CredentialMode::Anonymous => finish(response).await,
            CredentialMode::Bearer => {
                let error = read_failure(response).await;
                self.inner.signals.broadcast(AuthFailure::BearerRejected {
                    path: descriptor.path().to_string(),
                });
                Err(error)
            }
            CredentialMode::Session => {
                drop(response);
                debug!("Session rejected, refreshing before replay");
                self.refresh_session().await?;
                self.replay(descriptor).await
            }
        }
    }

    /// Send once more after a refresh; a second 401 is returned as is
    async fn replay(&self, descriptor: &RequestDescriptor) -> Result<Value, ClientError> {
        debug!("Replaying request after session refresh");
        let (response, _) = self.dispatch(descriptor).await?;
        finish(response).await
    }

    async fn dispatch(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<(Response, CredentialMode), ClientError> {
        let (mode, token) = if descriptor.needs_auth() {
            match self.bearer_token().await {
                Some(token) => (CredentialMode::Bearer, Some(token)),
                None => (CredentialMode::Session, None),
            }
        } else {
            (CredentialMode::Anonymous, None)
        };

        let request = self.build_request(descriptor, token.as_deref(), mode)?;
        match request.send().await {
            Ok(response) => {
                debug!(status = response.status().as_u16(), ?mode, "Response received");
                Ok((response, mode))
            }
            Err(err) => {
                if descriptor.needs_auth() {
                    self.inner.signals.broadcast(AuthFailure::Transport {
                        path: descriptor.path().to_string(),
                        message: err.to_string(),
                    });
                }
                Err(ClientError::Request(err))
            }
        }
    }

    /// Token from the provider, or `None` to fall back to the cookie session
    async fn bearer_token(&self) -> Option<String> {
        match self.inner.credentials.token(false).await {
            Ok(token) => token.filter(|token| !token.is_empty()),
            Err(err) => {
                warn!(error = %err, "Credential provider failed, using cookie session");
                None
            }
        }
    }

    fn build_request(
        &self,
        descriptor: &RequestDescriptor,
        token: Option<&str>,
        mode: CredentialMode,
    ) -> Result<RequestBuilder, ClientError> {
        let mut request = self
            .inner
            .http
            .request(descriptor.method().clone(), self.url(descriptor.path()));

        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        request = with_ambient_credentials(request, mode);

        if let Some(key) = descriptor.idempotency_key() {
            request = request.header(IdempotencyKey::HEADER, key.as_str());
        }

        match descriptor.body() {
            Some(RequestBody::Json(body)) => request = request.json(body),
            Some(RequestBody::Multipart(parts)) => {
                let form = parts.iter().try_fold(Form::new(), |form, part| {
                    Ok::<_, ClientError>(form.part(part.name.clone(), part.to_part()?))
                })?;
                request = request.multipart(form);
            }
            None => {}
        }

        Ok(request)
    }

    /// Refresh the cookie session, or wait for the refresh already in flight
    async fn refresh_session(&self) -> Result<(), ClientError> {
        match self.inner.refresh.enter() {
            Entry::Leader(lease) => {
                info!("Refreshing session");
                match self.inner.credentials.refresh_session().await {
                    Ok(()) => {
                        let released = lease.settle(&Settled::Refreshed);
                        info!(released, "Session refreshed");
                        Ok(())
                    }
                    Err(err) => {
                        let err = Arc::new(err);
                        let released = lease.settle(&Settled::Failed(Arc::clone(&err)));
                        debug!(released, "Rejected queued requests");
                        self.inner.signals.broadcast(AuthFailure::RefreshFailed {
                            message: err.to_string(),
                        });
                        Err(ClientError::SessionRefresh(err))
                    }
                }
            }
            Entry::Follower(rx) => {
                debug!("Session refresh in flight, queued");
                match refresh::wait(rx).await {
                    Settled::Refreshed => Ok(()),
                    Settled::Failed(err) => Err(ClientError::SessionRefresh(err)),
                    Settled::Abandoned => Err(ClientError::RefreshAbandoned),
                }
            }
        }
    }
}

/// Cookies travel automatically natively; browsers need to be told
#[cfg(target_arch = "wasm32")]
fn with_ambient_credentials(request: RequestBuilder, mode: CredentialMode) -> RequestBuilder {
    if mode == CredentialMode::Session {
        request.fetch_credentials_include()
    } else {
        request
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[allow(clippy::missing_const_for_fn)]
fn with_ambient_credentials(request: RequestBuilder, _mode: CredentialMode) -> RequestBuilder {
    request
}
