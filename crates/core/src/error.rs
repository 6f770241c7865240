//! Errors raised while setting up the client

use thiserror::Error;

pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    /// A source could not be read or did not deserialize into settings
    #[error("Failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    /// Settings loaded but describe something the client cannot use
    #[error("Invalid setting `{field}`: {reason}")]
    InvalidSetting { field: &'static str, reason: String },

    /// A global tracing subscriber was already installed
    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

impl CoreError {
    pub fn invalid_setting(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidSetting {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending setting, when one is known
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidSetting { field, .. } => Some(*field),
            Self::Load(_) | Self::Logging(_) => None,
        }
    }
}
