//! # Logging
//!
//! Installs the global `tracing` subscriber.
//!
//! `RUST_LOG` takes precedence over the configured filter directive.

use crate::infrastructure::settings::{LogFormat, LoggingSettings, SettingsError};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber in the configured format.
///
/// # Errors
///
/// Returns `SettingsError::Logging` if the filter directive is invalid or a
/// global subscriber is already installed.
pub fn init_logging(settings: &LoggingSettings) -> Result<(), SettingsError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.filter)
            .map_err(|e| SettingsError::Logging(format!("invalid filter: {e}")))?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let result = match settings.format {
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .json(),
            )
            .try_init(),
    };

    result.map_err(|e| SettingsError::Logging(e.to_string()))
}
