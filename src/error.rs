//! Error types for skyfetch.
//!
//! Every failure of a connector invocation is represented by the
//! `SkyfetchError` enum. All variants are fatal: the pipeline aborts at the
//! point of detection and nothing is written to disk.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all skyfetch operations.
#[derive(Deserialize, Serialize, Error, Debug, Clone, PartialEq)]
pub enum SkyfetchError {
    /// Missing, invalid or mutually exclusive parameters.
    #[error("{0}")]
    Config(String),

    /// Non-200 response from an upstream fetch.
    #[error("upstream returned status {status_code} for {url}")]
    Upstream {
        status_code: u16,
        url: String,
        history: Vec<String>,
    },

    /// Payload does not fit the declared transform.
    #[error("status {status_code}: {message}")]
    Transform {
        status_code: u16,
        message: String,
    },

    /// Filesystem failure while writing an artifact.
    #[error("failed to write '{path}': {message}")]
    Persistence {
        path: String,
        message: String,
    },

    /// Transport failure before any status code was received.
    #[error("{0}")]
    Http(String),

    /// Malformed configuration data.
    #[error("{0}")]
    Convert(String),
}

impl SkyfetchError {
    /// Status code already obtained when the error happened, 0 if no call completed.
    pub fn status_code(&self) -> u16 {
        match self {
            SkyfetchError::Upstream { status_code, .. } | SkyfetchError::Transform { status_code, .. } => *status_code,
            _ => 0,
        }
    }
}

impl From<toml::de::Error> for SkyfetchError {
    fn from(error: toml::de::Error) -> Self {
        SkyfetchError::Convert(error.to_string())
    }
}

impl From<reqwest::Error> for SkyfetchError {
    fn from(error: reqwest::Error) -> Self {
        SkyfetchError::Http(error.to_string())
    }
}

impl From<jsonschema::ValidationError<'_>> for SkyfetchError {
    fn from(error: jsonschema::ValidationError<'_>) -> Self {
        SkyfetchError::Config(error.to_string())
    }
}
