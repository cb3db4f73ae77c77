//! `datamesh-manager-mcp call` - run one tool invocation from the shell.
//!
//! The output is exactly what an MCP client would receive as text content.

use anyhow::{Context, Result};
use dmm_client::HttpConnector;
use dmm_core::ServerConfig;
use dmm_mcp::protocol::ToolContent;
use dmm_mcp::DataMeshTools;
use serde_json::Value;
use std::sync::Arc;

pub async fn run(config: ServerConfig, tool: &str, raw_args: &str) -> Result<()> {
    let arguments: Value =
        serde_json::from_str(raw_args).with_context(|| format!("--args is not valid JSON: {raw_args}"))?;

    let connector = HttpConnector::new(config.registry).context("Failed to build HTTP client")?;
    let tools = DataMeshTools::new(Arc::new(connector));
    let response = tools.call(tool, arguments).await?;

    for content in &response.content {
        let ToolContent::Text { text } = content;
        println!("{}", text);
    }

    if response.is_error {
        anyhow::bail!("Tool {} reported an error", tool);
    }
    Ok(())
}
