//! Client error types

use super::credentials::CredentialError;
use std::sync::Arc;
use thiserror::Error;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error, including timeouts
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Credentials were rejected (401)
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The cookie session could not be refreshed; shared by every caller
    /// that was waiting on the same refresh
    #[error("Session refresh failed: {0}")]
    SessionRefresh(#[source] Arc<CredentialError>),

    /// The task refreshing the session was dropped before it finished
    #[error("Session refresh was abandoned before it completed")]
    RefreshAbandoned,

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Create error from HTTP status code
    pub fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            400 => Self::BadRequest(message),
            401 => Self::AuthenticationFailed(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            _ => Self::ServerError {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// HTTP status behind this error, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ServerError { status, .. } => Some(*status),
            Self::AuthenticationFailed(_) => Some(401),
            Self::NotFound(_) => Some(404),
            Self::BadRequest(_) => Some(400),
            Self::Forbidden(_) => Some(403),
            Self::Request(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Human-readable message suitable for showing to a user
    ///
    /// For HTTP errors this is the server-supplied message (or the generic
    /// fallback), without the status prefix used by `Display`.
    pub fn message(&self) -> String {
        match self {
            Self::ServerError { message, .. }
            | Self::AuthenticationFailed(message)
            | Self::NotFound(message)
            | Self::BadRequest(message)
            | Self::Forbidden(message) => message.clone(),
            other => other.to_string(),
        }
    }

    /// Whether this error means the user's credentials are no longer usable
    pub const fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed(_) | Self::SessionRefresh(_) | Self::RefreshAbandoned
        )
    }
}
