//! Logging configuration using the tracing ecosystem.

use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use crate::error::{BotError, Result};

/// Default log level if RUST_LOG is not set.
const DEFAULT_LOG_FILTER: &str = "coordinate_bot=info,register_commands=info,warn";

/// Install a stderr subscriber filtered by `RUST_LOG`.
pub fn init() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| BotError::new("logging_init").push_std(e))?;

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "Logging initialised");
    Ok(())
}
