use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod logging;

use commands::tools::ToolsCommand;
use config::GlobalArgs;

#[derive(Parser, Debug)]
#[command(
    name = "datamesh-manager-mcp",
    version,
    about = "MCP server for the Data Mesh Manager catalog"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve MCP over stdin/stdout (the default).
    Serve,

    /// Inspect the registered tools.
    Tools {
        #[command(subcommand)]
        cmd: ToolsCommand,
    },

    /// Print the workflow prompt offered to agents.
    Prompt,

    /// Run a single tool call against the registry and print the result.
    Call {
        /// Tool name, e.g. dataproduct_list.
        tool: String,

        /// Tool arguments as a JSON object.
        #[arg(long, default_value = "{}")]
        args: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let dotenv = config::load_dotenv();
    let resolved = config::resolve(&cli.global, |name| std::env::var(name).ok())?;
    logging::init(&resolved.config.logging, cli.global.log_level.as_deref())?;
    if !resolved.file_found {
        tracing::warn!(config = %cli.global.config.display(), "Config file not found, using defaults");
    }
    if let Some(path) = &dotenv {
        tracing::debug!(path = %path.display(), "Loaded environment from .env");
    }

    match cli.cmd.unwrap_or(Command::Serve) {
        Command::Serve => commands::serve::run(resolved.config).await?,
        Command::Tools { cmd } => commands::tools::execute(cmd)?,
        Command::Prompt => commands::prompt::print(),
        Command::Call { tool, args } => commands::call::run(resolved.config, &tool, &args).await?,
    }

    Ok(())
}
