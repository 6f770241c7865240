//! Outgoing request descriptions
//!
//! A [`RequestDescriptor`] holds everything needed to (re)build a request, so
//! the same call can be replayed after a session refresh.

use super::ClientError;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use travelog_core::IdempotencyKey;

/// Replayable request body
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    Multipart(Vec<UploadPart>),
}

/// One field of a multipart upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPart {
    pub name: String,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    pub data: Vec<u8>,
}

impl UploadPart {
    /// A file field
    pub fn file(
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            file_name: Some(file_name.into()),
            mime_type: Some(mime_type.into()),
            data: data.into(),
        }
    }

    /// A plain text field
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_name: None,
            mime_type: None,
            data: value.into().into_bytes(),
        }
    }

    pub(crate) fn to_part(&self) -> Result<reqwest::multipart::Part, ClientError> {
        let mut part = reqwest::multipart::Part::bytes(self.data.clone());
        if let Some(file_name) = &self.file_name {
            part = part.file_name(file_name.clone());
        }
        if let Some(mime_type) = &self.mime_type {
            part = part.mime_str(mime_type)?;
        }
        Ok(part)
    }
}

/// Everything needed to send, and later replay, one API call
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    method: Method,
    path: String,
    body: Option<RequestBody>,
    idempotency_key: Option<IdempotencyKey>,
    needs_auth: bool,
}

impl RequestDescriptor {
    /// A call sent without credentials
    pub fn public(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            idempotency_key: None,
            needs_auth: false,
        }
    }

    /// A call that needs a bearer token or the cookie session
    pub fn authenticated(method: Method, path: impl Into<String>) -> Self {
        Self {
            needs_auth: true,
            ..Self::public(method, path)
        }
    }

    /// Attach a JSON body
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Serialization`] if `body` cannot be serialized
    pub fn with_json<B: Serialize + ?Sized>(self, body: &B) -> Result<Self, ClientError> {
        Ok(self.with_body(RequestBody::Json(serde_json::to_value(body)?)))
    }

    /// Attach multipart form fields
    #[must_use]
    pub fn with_parts(self, parts: Vec<UploadPart>) -> Self {
        self.with_body(RequestBody::Multipart(parts))
    }

    #[must_use]
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_idempotency_key(mut self, key: impl Into<IdempotencyKey>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    pub const fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub const fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    pub const fn idempotency_key(&self) -> Option<&IdempotencyKey> {
        self.idempotency_key.as_ref()
    }

    pub const fn needs_auth(&self) -> bool {
        self.needs_auth
    }
}
