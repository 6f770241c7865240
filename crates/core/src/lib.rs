//! Travelog core types and utilities

pub mod error;
pub mod idempotency;
pub mod logging;
pub mod settings;

pub use error::{CoreError, CoreResult};
pub use idempotency::IdempotencyKey;
pub use logging::{LogConfig, init_logging};
pub use settings::{ClientSettings, DEFAULT_REFRESH_PATH};
