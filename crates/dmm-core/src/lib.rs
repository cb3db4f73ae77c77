//! Shared configuration for the Data Mesh Manager MCP server.
//!
//! Every other crate in the workspace receives its settings from the
//! [`ServerConfig`] built here once at startup.

pub mod config;

pub use config::{
    AuthScheme, ConfigError, LogFormat, LoggingConfig, McpConfig, RegistryConfig, ServerConfig,
};
