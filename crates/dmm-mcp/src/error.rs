//! Error types for the MCP crate.
//!
//! These cover the protocol host only. Failures inside a tool never become an
//! `McpError`; they are returned to the caller as tool output.

use crate::protocol::error_codes;
use thiserror::Error;

/// Errors that can occur in the MCP server.
#[derive(Debug, Error)]
pub enum McpError {
    /// Tool not found.
    #[error("Tool not found: {name}")]
    ToolNotFound { name: String },

    /// Invalid arguments for tool.
    #[error("Invalid arguments for tool {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    /// Prompt not found.
    #[error("Prompt not found: {name}")]
    PromptNotFound { name: String },

    /// Outbound serialization error.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl McpError {
    /// JSON-RPC error code reported for this error.
    pub fn code(&self) -> i32 {
        match self {
            McpError::ToolNotFound { .. }
            | McpError::InvalidArguments { .. }
            | McpError::PromptNotFound { .. } => error_codes::INVALID_PARAMS,
            McpError::SerializationError(_) | McpError::IoError(_) => error_codes::INTERNAL_ERROR,
        }
    }
}
