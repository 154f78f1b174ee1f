//! Configuration errors
//!
//! The simulation itself never fails; only loading settings and catalogs can.

use thiserror::Error;

/// Errors raised while loading settings or catalog data
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// File contents were not valid JSON for the expected shape
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Parsed value is out of range
    #[error("invalid config field `{field}`: {reason}")]
    Invalid {
        field: String,
        reason: String,
    },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
