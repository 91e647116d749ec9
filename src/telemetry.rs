//! Structured telemetry initialisation for the server.

use std::{
    io::{self, IsTerminal},
    sync::OnceLock,
};

use tracing::{subscriber::SetGlobalDefaultError, Subscriber};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LogFormat;

static TELEMETRY_GUARD: OnceLock<()> = OnceLock::new();

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Failed to parse the configured log filter expression.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// Failed to install the tracing subscriber.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(#[from] SetGlobalDefaultError),
}

/// Installs the global tracing subscriber on first use; later calls are no-ops.
pub fn initialise(filter: &str, format: LogFormat) -> Result<(), TelemetryError> {
    if TELEMETRY_GUARD.get().is_some() {
        return Ok(());
    }
    install_subscriber(filter, format)?;
    let _ = TELEMETRY_GUARD.set(());
    Ok(())
}

fn install_subscriber(filter: &str, format: LogFormat) -> Result<(), TelemetryError> {
    let filter =
        EnvFilter::try_new(filter).map_err(|error| TelemetryError::Filter(error.to_string()))?;

    let builder = |filter: EnvFilter| {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal())
            .with_timer(fmt::time::UtcTime::rfc_3339())
    };

    let subscriber: Box<dyn Subscriber + Send + Sync> = match format {
        LogFormat::Json => Box::new(builder(filter).json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(builder(filter).compact().finish()),
    };

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
