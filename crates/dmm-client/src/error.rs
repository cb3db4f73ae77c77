//! Error types for the registry client.

use thiserror::Error;

/// Errors returned by the registry client.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Required configuration (API key, base URL) is missing or invalid.
    /// Raised while building a client, before any network call.
    #[error("{0}")]
    Configuration(String),

    /// The registry answered with a non-success status other than 404.
    #[error("registry returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The request did not complete within the configured timeout.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Connection or protocol failure below HTTP.
    #[error("request failed: {0}")]
    Transport(String),

    /// The response body was not the expected JSON shape.
    #[error("malformed response body: {0}")]
    Decode(String),
}

/// Coarse classification used by the MCP tools to pick an error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A precondition the operator can fix directly.
    Configuration,
    /// Anything that went wrong talking to the registry.
    Upstream,
}

impl RegistryError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::Configuration(_) => ErrorKind::Configuration,
            RegistryError::Status { .. }
            | RegistryError::Timeout { .. }
            | RegistryError::Transport(_)
            | RegistryError::Decode(_) => ErrorKind::Upstream,
        }
    }

    /// The upstream HTTP status, when the registry sent one.
    pub fn status(&self) -> Option<u16> {
        match self {
            RegistryError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn missing_api_key(source: &str) -> Self {
        RegistryError::Configuration(format!(
            "Data Mesh Manager API key is not configured. Set the {source} environment variable."
        ))
    }

    pub(crate) fn missing_base_url(source: &str) -> Self {
        RegistryError::Configuration(format!(
            "Data Mesh Manager host is not configured. Set the {source} environment variable."
        ))
    }

    pub(crate) fn invalid_base_url(url: &str, reason: impl std::fmt::Display) -> Self {
        RegistryError::Configuration(format!(
            "Invalid Data Mesh Manager host '{url}': {reason}"
        ))
    }
}
