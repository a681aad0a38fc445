use std::path::PathBuf;

use thiserror::Error;

/// Raised while building a [`RenderConfig`](crate::RenderConfig).
///
/// Every limit is validated up front, so a render never discovers a bad
/// configuration half way through a value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: i64 },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure reported by user inspection code: an [`Inspect`](crate::Inspect)
/// hook or a registered render function.
///
/// The engine never lets one of these escape; it turns them into an
/// `<unrenderable: TYPE>` placeholder for the offending leaf.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("inspection failed: {message}")]
pub struct InspectError {
    message: String,
}

impl InspectError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for InspectError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for InspectError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}
