//! Tracing subscriber setup
//!
//! Library code only emits `tracing` events. Applications embedding the client
//! call [`init_logging`] once at startup to get them printed.

use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level filter (e.g., "info", "travelog_http=debug")
    pub log_level: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}

impl LogConfig {
    /// Development configuration with verbose client logs
    #[must_use]
    pub fn dev() -> Self {
        Self {
            log_level: "info,travelog_http=debug,travelog_core=debug".to_string(),
            json: false,
        }
    }

    /// Build the filter, letting `RUST_LOG` win over the configured level
    fn env_filter(&self) -> EnvFilter {
        let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
        filter_from(from_env.as_deref(), &self.log_level)
    }
}

/// First directive set that parses wins; "info" otherwise
fn filter_from(env: Option<&str>, level: &str) -> EnvFilter {
    env.filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Install the global tracing subscriber
///
/// # Errors
///
/// Returns an error if a global subscriber has already been installed
pub fn init_logging(config: &LogConfig) -> CoreResult<()> {
    let registry = tracing_subscriber::registry().with(config.env_filter());

    let result = if config.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
    };

    result.map_err(|e| CoreError::Logging(e.to_string()))?;
    tracing::debug!(level = %config.log_level, json = config.json, "Logging initialized");
    Ok(())
}
