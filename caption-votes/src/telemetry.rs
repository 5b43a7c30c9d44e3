//! Tracing initialization.
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogFormat;
use crate::errors::AppError;

const DEFAULT_FILTER: &str = "caption_votes=info,caption_votes_service=info";

/// Installs the global subscriber: JSON lines for log shippers, pretty
/// console output otherwise. `RUST_LOG` overrides the default filter.
pub fn init_tracing(format: LogFormat) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .try_init(),
    };

    result.map_err(|e| AppError::Telemetry(e.to_string()))
}
