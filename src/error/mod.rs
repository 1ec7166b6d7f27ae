//! Error handling for the ownership engine.

use std::io;

pub mod util;

/// Specialized error type for ownership aggregation and detail composition
#[derive(Debug, thiserror::Error)]
pub enum HerdError {
    /// A collaborator endpoint failed
    #[error("Fetch error from {endpoint}: {message}")]
    Fetch {
        /// Logical endpoint name, e.g. `animals` or `sheds/12`
        endpoint: String,
        /// Error reported by the collaborator
        message: String,
    },

    /// Payload could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error reading a file-backed data source
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Payload matched none of the known response shapes
    #[error("Unsupported response shape: {0}")]
    UnsupportedShape(String),

    /// Internal state could not be accessed
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

impl HerdError {
    /// Build a fetch error for the given endpoint
    pub fn fetch(endpoint: impl Into<String>, message: impl ToString) -> Self {
        Self::Fetch {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }

    /// Whether the error came from a collaborator fetch
    #[must_use]
    pub const fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }
}

/// Result type for ownership engine operations
pub type Result<T> = std::result::Result<T, HerdError>;
