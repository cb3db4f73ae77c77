//! Configuration types for the Data Mesh Manager MCP server.
//!
//! Configuration is read from an optional YAML file (`datamesh-manager-mcp.yaml`)
//! and then overlaid with environment variables. The CLI applies its own flags
//! last and hands the resulting [`ServerConfig`] to the server by reference.
//!
//! ```yaml
//! registry:
//!   base_url: https://api.datamesh-manager.com
//!   api_key_env: DATAMESH_MANAGER_API_KEY
//!   timeout_seconds: 30
//!   auth_scheme: bearer
//! mcp:
//!   server_name: datamesh-manager
//! logging:
//!   level: info
//!   format: text
//! ```

pub mod logging;
pub mod mcp;
pub mod registry;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use logging::{LogFormat, LoggingConfig};
pub use mcp::McpConfig;
pub use registry::{AuthScheme, RegistryConfig};

/// Complete server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Remote registry connection settings.
    #[serde(default)]
    pub registry: RegistryConfig,

    /// MCP server identity.
    #[serde(default)]
    pub mcp: McpConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ServerConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay values taken from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Overlay values from an arbitrary variable lookup.
    ///
    /// `lookup` receives a variable name and returns its value, if set.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        self.registry = self.registry.with_overrides_from(&lookup);
        self
    }

    /// Reject settings that can never work.
    ///
    /// A missing API key is not an error at this point; it surfaces on each
    /// tool call instead.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.registry.timeout_seconds == 0 {
            return Err(ConfigError::Config(
                "registry.timeout_seconds must be greater than zero".to_string(),
            ));
        }
        if self.mcp.server_name.trim().is_empty() {
            return Err(ConfigError::Config(
                "mcp.server_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
