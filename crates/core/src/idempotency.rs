//! Idempotency keys for retried writes

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Key sent with a write so the API can recognise a retry of the same
/// logical operation.
///
/// The key travels unchanged on the original request and on any replay.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    /// Header carrying the key on outgoing requests
    pub const HEADER: &'static str = "Idempotency-Key";

    /// Derive a key from an operation name and its parameters
    ///
    /// Repeating the same operation on the same target yields the same key, so
    /// the server treats it as one write.
    #[must_use]
    pub fn new(operation: &str, params: &[&str]) -> Self {
        Self(format!("{}:{}", operation, params.join(":")))
    }

    /// Generate a fresh random key
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for IdempotencyKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for IdempotencyKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
