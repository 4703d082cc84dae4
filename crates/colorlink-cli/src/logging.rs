//! Log output setup

use crate::config::LoggingConfig;
use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber on stderr
///
/// `RUST_LOG` wins over the configured filter; `json` overrides the
/// configured format.
///
/// # Errors
/// Invalid filter directives or a subscriber already installed.
pub fn init(config: &LoggingConfig, json: bool) -> Result<()> {
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives)?,
        _ => EnvFilter::try_new(&config.filter)?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let installed = if json || config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow!("failed to install log subscriber: {e}"))
}
