//! Structured logging setup
//!
//! Every tenmap crate emits `tracing` events: `debug` for metadata operations
//! and codec activity. This module installs a `tracing-subscriber` to print
//! them, when the `tracing` feature is enabled.
//!
//! # Example
//!
//! ```ignore
//! use tenmap::tracing_support::{init_tracing, TracingConfig, TracingFormat};
//!
//! init_tracing(
//!     TracingConfig::default()
//!         .format(TracingFormat::Compact)
//!         .filter("tenmap_core=debug,info"),
//! )?;
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: filter directive (e.g. `RUST_LOG=tenmap_io=debug`)
//! - `TENMAP_LOG_FORMAT`: output format, `pretty`, `json` or `compact`
//!   (default: `pretty`)

#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Default filter when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "tenmap=info,warn";

/// Tracing output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracingFormat {
    /// Pretty-printed human-readable format
    Pretty,
    /// JSON format for structured logging
    Json,
    /// Single line per event
    Compact,
}

impl TracingFormat {
    /// Parse from string, falling back to [`TracingFormat::Pretty`]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => TracingFormat::Json,
            "compact" => TracingFormat::Compact,
            _ => TracingFormat::Pretty,
        }
    }
}

/// Tracing configuration
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub format: TracingFormat,
    /// Filter directive (e.g. "tenmap_core=debug,info")
    pub filter: String,
    pub with_ansi: bool,
    pub with_target: bool,
    pub with_file: bool,
    pub with_line_number: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        let format = std::env::var("TENMAP_LOG_FORMAT")
            .map(|s| TracingFormat::parse(&s))
            .unwrap_or(TracingFormat::Pretty);

        let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_string());

        Self {
            format,
            filter,
            with_ansi: true,
            with_target: true,
            with_file: false,
            with_line_number: false,
        }
    }
}

impl TracingConfig {
    pub fn format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_ansi(mut self, with_ansi: bool) -> Self {
        self.with_ansi = with_ansi;
        self
    }

    pub fn with_target(mut self, with_target: bool) -> Self {
        self.with_target = with_target;
        self
    }

    pub fn with_file(mut self, with_file: bool) -> Self {
        self.with_file = with_file;
        self
    }

    pub fn with_line_number(mut self, with_line_number: bool) -> Self {
        self.with_line_number = with_line_number;
        self
    }
}

/// Install a global tracing subscriber with the given configuration
///
/// This should be called once at application startup; a second call fails
/// because a global subscriber is already set.
#[cfg(feature = "tracing")]
pub fn init_tracing(config: TracingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(&config.filter)?;

    match config.format {
        TracingFormat::Pretty => {
            let layer = fmt::layer()
                .pretty()
                .with_ansi(config.with_ansi)
                .with_target(config.with_target)
                .with_file(config.with_file)
                .with_line_number(config.with_line_number)
                .with_filter(filter);
            tracing_subscriber::registry().with(layer).try_init()?;
        }
        TracingFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_target(config.with_target)
                .with_file(config.with_file)
                .with_line_number(config.with_line_number)
                .with_filter(filter);
            tracing_subscriber::registry().with(layer).try_init()?;
        }
        TracingFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_ansi(config.with_ansi)
                .with_target(config.with_target)
                .with_file(config.with_file)
                .with_line_number(config.with_line_number)
                .with_filter(filter);
            tracing_subscriber::registry().with(layer).try_init()?;
        }
    }

    tracing::debug!(format = ?config.format, filter = %config.filter, "tracing initialized");
    Ok(())
}

/// No-op when the `tracing` feature is disabled
#[cfg(not(feature = "tracing"))]
pub fn init_tracing(_config: TracingConfig) -> anyhow::Result<()> {
    Ok(())
}
