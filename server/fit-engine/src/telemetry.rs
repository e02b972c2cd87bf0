//! Log subscriber setup shared by the binaries.
//!
//! Logs always go to stderr; stdout is reserved for JSON output.

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum TelemetryError {
  #[error("invalid log filter '{value}'")]
  EnvFilter {
    value: String,
    #[source]
    source: ParseError,
  },

  #[error("telemetry: {0}")]
  Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

/// `RUST_LOG` when set, else `fallback`.
pub fn init(fallback: &str) -> Result<(), TelemetryError> {
  let env_filter = match EnvFilter::try_from_default_env() {
    Ok(filter) => filter,
    Err(_) => EnvFilter::try_new(fallback).map_err(|source| TelemetryError::EnvFilter {
      value: fallback.to_string(),
      source,
    })?,
  };

  tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .compact()
    .with_ansi(false)
    .try_init()
    .map_err(TelemetryError::Subscriber)
}
