//! Client configuration
//!
//! Settings are layered: built-in defaults, then an optional file (format
//! chosen by extension), then `TRAVELOG_*` environment variables.

use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Prefix for environment variable overrides, e.g. `TRAVELOG_BASE_URL`
pub const ENV_PREFIX: &str = "TRAVELOG";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Refresh endpoint used when none is configured
pub const DEFAULT_REFRESH_PATH: &str = "/auth/refresh";

/// Settings for talking to the Travelog API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// API origin, e.g. `https://api.travelog.app`
    pub base_url: String,

    /// Request timeout in seconds (0 = rely on the transport default)
    pub timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: String,

    /// Path of the cookie-session refresh endpoint
    pub session_refresh_path: String,
}

impl ClientSettings {
    /// Load settings from an optional file plus the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a value cannot be parsed,
    /// or the resulting settings fail validation
    pub fn load(path: Option<&Path>) -> CoreResult<Self> {
        Self::load_with_env(path, None)
    }

    /// Load settings from defaults and environment variables only
    ///
    /// # Errors
    ///
    /// Returns an error if `TRAVELOG_BASE_URL` is missing or invalid
    pub fn from_env() -> CoreResult<Self> {
        Self::load(None)
    }

    fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> CoreResult<Self> {
        let mut builder = config::Config::builder()
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .set_default("user_agent", default_user_agent())?
            .set_default("session_refresh_path", DEFAULT_REFRESH_PATH)?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        let settings: Self = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Check that the settings describe a usable API endpoint
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidSetting`] for the first problem found
    pub fn validate(&self) -> CoreResult<()> {
        let url = url::Url::parse(&self.base_url).map_err(|e| {
            CoreError::invalid_setting("base_url", format!("'{}' is not a URL: {e}", self.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CoreError::invalid_setting(
                "base_url",
                format!("must use http or https, got '{}'", url.scheme()),
            ));
        }
        if !self.session_refresh_path.starts_with('/') {
            return Err(CoreError::invalid_setting(
                "session_refresh_path",
                "must start with '/'",
            ));
        }
        Ok(())
    }

    /// Request timeout, if one is configured
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        if self.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.timeout_secs))
        }
    }
}

fn default_user_agent() -> String {
    format!("travelog-client/{}", env!("CARGO_PKG_VERSION"))
}
