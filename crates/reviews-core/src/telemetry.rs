//! Tracing subscriber setup.
//!
//! Installs a global `tracing` subscriber with an `EnvFilter` and a `fmt`
//! layer. `RUST_LOG` wins over the configured level when set.

#[cfg(feature = "telemetry")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ReviewsResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output for local development.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

/// Tracing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Default filter directive, e.g. `info` or `info,reviews=debug`.
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "info,reviews=debug,tower_http=debug".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

/// Initializes the global tracing subscriber.
#[cfg(feature = "telemetry")]
pub fn init_tracing(config: &TelemetryConfig) -> ReviewsResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| crate::ReviewsError::Configuration(format!("Invalid log filter: {e}")))?;

    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(false))
            .try_init(),
    };

    result.map_err(|e| crate::ReviewsError::internal(format!("Failed to install subscriber: {e}")))?;

    tracing::debug!(level = %config.level, format = %config.format, "Tracing initialized");
    Ok(())
}

/// No-op when the `telemetry` feature is disabled.
#[cfg(not(feature = "telemetry"))]
pub fn init_tracing(_config: &TelemetryConfig) -> ReviewsResult<()> {
    Ok(())
}
