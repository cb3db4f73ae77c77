//! `datamesh-manager-mcp serve` - run the MCP server on stdio.

use anyhow::{Context, Result};
use dmm_client::HttpConnector;
use dmm_core::ServerConfig;
use dmm_mcp::McpServer;
use std::sync::Arc;
use tracing::{info, warn};

/// Serve until stdin closes or the process is interrupted.
pub async fn run(config: ServerConfig) -> Result<()> {
    if config.registry.api_key().is_none() {
        warn!(
            variable = config.registry.api_key_source(),
            "No API key configured; every tool call will report it"
        );
    }
    info!(
        base_url = ?config.registry.base_url(),
        timeout_secs = config.registry.timeout_seconds,
        auth_scheme = ?config.registry.auth_scheme,
        "Registry settings"
    );

    let connector = HttpConnector::new(config.registry.clone()).context("Failed to build HTTP client")?;
    let server = Arc::new(McpServer::new(Arc::new(config), Arc::new(connector)));

    tokio::select! {
        result = server.run_stdio() => result.context("MCP server failed")?,
        _ = tokio::signal::ctrl_c() => info!("Interrupted, shutting down"),
    }

    Ok(())
}
