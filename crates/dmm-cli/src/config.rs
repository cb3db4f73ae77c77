//! Configuration resolution.
//!
//! Settings are layered, later layers winning:
//! 1. The YAML config file, when present
//! 2. Environment variables (`DATAMESH_MANAGER_API_KEY`, `DATAMESH_MANAGER_HOST`),
//!    including those loaded from a `.env` file
//! 3. Command-line flags

use anyhow::{Context, Result};
use clap::Args;
use dmm_core::ServerConfig;
use std::path::PathBuf;

/// Flags shared by every subcommand.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Configuration file path.
    #[arg(short, long, global = true, default_value = "datamesh-manager-mcp.yaml")]
    pub config: PathBuf,

    /// Registry base URL. Overrides the config file and DATAMESH_MANAGER_HOST.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Log filter directive, e.g. `debug` or `dmm_client=trace`. Overrides RUST_LOG.
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

/// The effective configuration.
#[derive(Debug)]
pub struct Resolved {
    pub config: ServerConfig,
    /// Whether the config file existed. Reported once logging is up.
    pub file_found: bool,
}

/// Load `.env` from the working directory or a parent into the process
/// environment. Variables that are already set keep their value.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Build the effective configuration from file, environment and flags.
pub fn resolve(args: &GlobalArgs, lookup: impl Fn(&str) -> Option<String>) -> Result<Resolved> {
    let file_found = args.config.exists();
    let config = if file_found {
        ServerConfig::from_file(&args.config)
            .with_context(|| format!("Failed to load config file: {:?}", args.config))?
    } else {
        ServerConfig::default()
    };

    let mut config = config.with_overrides_from(lookup);
    if let Some(base_url) = &args.base_url {
        config.registry.base_url = Some(base_url.clone());
    }
    if let Some(timeout) = args.timeout {
        config.registry.timeout_seconds = timeout;
    }
    config.validate().context("Invalid configuration")?;

    Ok(Resolved { config, file_found })
}
