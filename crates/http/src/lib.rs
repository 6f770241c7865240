//! Travelog HTTP client
//!
//! Wraps the Travelog REST API behind an [`ApiClient`] that attaches
//! credentials, recovers from expired cookie sessions with a single shared
//! refresh, and reports unrecoverable authentication failures on an
//! [`AuthSignals`] channel.

#[macro_use]
extern crate tracing;

pub mod client;

pub use client::{
    ApiClient, ApiClientBuilder,
    credentials::{CredentialError, CredentialProvider, SessionEndpoint, StaticToken},
    descriptor::{RequestBody, RequestDescriptor, UploadPart},
    error::ClientError,
    signals::{AuthFailure, AuthSignals},
};
pub use travelog_core::IdempotencyKey;
