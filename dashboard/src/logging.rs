//! Tracing subscriber initialization.
//!
//! Logs go to stderr so the rendered screen on stdout stays clean.
//! Respects `RUST_LOG`, defaulting to `info`.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}

pub fn init(verbose: bool) -> Result<(), LoggingError> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}
