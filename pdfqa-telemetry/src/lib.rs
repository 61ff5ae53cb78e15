//! # pdfqa-telemetry
//!
//! Process-wide `tracing` setup for the pdfqa service.
//!
//! Call [`init_telemetry`] once at start-up. Log levels come from `RUST_LOG`
//! (falling back to the configured default directive) and the output is
//! either human-readable or one JSON object per line.
//!
//! ```rust,ignore
//! use pdfqa_telemetry::{LogFormat, TelemetryConfig, init_telemetry};
//!
//! init_telemetry(&TelemetryConfig::new("pdfqa").with_format(LogFormat::Json))?;
//! tracing::info!("ready");
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log filter: {0}")]
    InvalidFilter(String),

    #[error("failed to install tracing subscriber: {0}")]
    Init(String),

    #[error("unknown log format '{0}', expected 'pretty' or 'json'")]
    UnknownFormat(String),
}

/// Output format of log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(TelemetryError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => f.write_str("pretty"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Subscriber settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub format: LogFormat,
    /// Filter used when `RUST_LOG` is unset.
    pub default_directive: String,
}

impl TelemetryConfig {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            format: LogFormat::default(),
            default_directive: "info".to_string(),
        }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }
}

fn env_filter(default_directive: &str) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_directive)
            .map_err(|e| TelemetryError::InvalidFilter(format!("{default_directive}: {e}"))),
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Fails if the default directive does not parse or a global subscriber is
/// already installed.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = env_filter(&config.default_directive)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    match config.format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().with_current_span(true).try_init(),
    }
    .map_err(|e| TelemetryError::Init(e.to_string()))?;

    tracing::info!(service = %config.service_name, format = %config.format, "telemetry initialized");
    Ok(())
}
