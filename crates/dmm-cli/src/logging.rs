//! Tracing subscriber setup.

use anyhow::{Context, Result};
use dmm_core::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber, writing to stderr.
///
/// The filter comes from `level_override`, else `RUST_LOG`, else
/// `logging.level`.
pub fn init(config: &LoggingConfig, level_override: Option<&str>) -> Result<()> {
    let filter = match level_override {
        Some(level) => EnvFilter::try_new(level).with_context(|| format!("Invalid log level: {level}"))?,
        None => match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(&config.level)
                .with_context(|| format!("Invalid logging.level: {}", config.level))?,
        },
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false);

    match config.format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
    Ok(())
}
