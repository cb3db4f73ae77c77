//! MCP server configuration.
//!
//! This module defines how the server identifies itself to MCP clients.

use serde::{Deserialize, Serialize};

/// Configuration for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpConfig {
    /// Name reported in the `initialize` response.
    #[serde(default = "default_server_name")]
    pub server_name: String,

    /// Optional free-text instructions sent with the `initialize` response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            server_name: default_server_name(),
            instructions: None,
        }
    }
}

fn default_server_name() -> String {
    "datamesh-manager".to_string()
}
