//! Tools introspection commands.
//!
//! `datamesh-manager-mcp tools list` - List the registered tools.
//! `datamesh-manager-mcp tools describe` - Show the full schema of one tool.

use anyhow::Result;
use clap::Subcommand;
use dmm_mcp::protocol::ToolDefinition;
use dmm_mcp::ToolRegistry;

#[derive(Subcommand, Debug)]
pub enum ToolsCommand {
    /// List registered tools.
    List {
        /// Also print each tool's input schema.
        #[arg(long)]
        verbose: bool,
    },

    /// Describe one tool by name.
    Describe { name: String },
}

pub fn execute(cmd: ToolsCommand) -> Result<()> {
    let registry = ToolRegistry::with_data_mesh_tools();
    match cmd {
        ToolsCommand::List { verbose } => list(&registry, verbose),
        ToolsCommand::Describe { name } => describe(&registry, &name),
    }
}

fn list(registry: &ToolRegistry, verbose: bool) -> Result<()> {
    println!("Available Tools ({}):", registry.len());

    for tool in registry.list() {
        println!("  • {} ({})", tool.name, badges(tool).join(", "));

        if let Some(desc) = &tool.description {
            println!("    {}", desc);
        }

        if verbose {
            println!(
                "    Schema: {}",
                serde_json::to_string_pretty(&tool.input_schema)?
            );
        }
    }

    Ok(())
}

fn describe(registry: &ToolRegistry, name: &str) -> Result<()> {
    let tool = registry.get(name).ok_or_else(|| {
        anyhow::anyhow!(
            "Tool '{}' not found. Available tools: {}",
            name,
            registry.names().join(", ")
        )
    })?;

    println!("Tool: {}", tool.name);

    if let Some(desc) = &tool.description {
        println!("\nDescription: {}", desc);
    }

    println!("\nInput Schema:");
    println!("{}", serde_json::to_string_pretty(&tool.input_schema)?);

    if let Some(annotations) = &tool.annotations {
        println!("\nAnnotations:");
        println!("{}", serde_json::to_string_pretty(annotations)?);
    }

    Ok(())
}

fn badges(tool: &ToolDefinition) -> Vec<&'static str> {
    let annotations = tool.annotations.as_ref();
    let mut badges = Vec::new();
    if annotations.is_some_and(|a| a.read_only_hint == Some(true)) {
        badges.push("read-only");
    }
    if annotations.is_some_and(|a| a.open_world_hint == Some(true)) {
        badges.push("remote");
    }
    badges
}
