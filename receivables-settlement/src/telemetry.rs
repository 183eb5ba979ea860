//! Tracing subscriber setup for hosts embedding the engine

use crate::{config::TelemetryConfig, Error, Result};
use tracing_subscriber::EnvFilter;

/// Install a global `tracing` subscriber.
///
/// `RUST_LOG` wins over the configured filter when set. Fails if a global
/// subscriber is already installed.
pub fn init_tracing(config: &TelemetryConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .map_err(|e| Error::Config(format!("Invalid log filter: {}", e)))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = if config.json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| Error::Config(format!("Failed to install tracing subscriber: {}", e)))?;

    tracing::info!("Tracing initialized");
    Ok(())
}
