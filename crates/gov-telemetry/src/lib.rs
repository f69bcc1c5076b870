//! # GovChain Telemetry
//!
//! Structured logging for GovChain binaries, built on `tracing` and
//! `tracing-subscriber`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gov_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env()).expect("Failed to init telemetry");
//!     // Application code here
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GC_SERVICE_NAME` | `govchain` | Service name in log lines |
//! | `GC_SUBSYSTEM_ID` | `00` | Subsystem identifier |
//! | `GC_LOG_LEVEL` | `info` | Log level filter (`RUST_LOG` also honoured) |
//! | `GC_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `GC_JSON_LOGS` | `false` | JSON lines instead of pretty output |

#![warn(missing_docs)]

mod config;
mod logging;
mod subscriber;

pub use config::TelemetryConfig;
pub use subscriber::build_filter;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// A global subscriber is already installed
    #[error("Failed to install subscriber: {0}")]
    SubscriberInit(String),

    /// Log level directive could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Install logging for the process.
///
/// Returns a guard to hold for the lifetime of the application; dropping it
/// logs the shutdown.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    subscriber::init_subscriber(&config)?;
    Ok(TelemetryGuard {
        service_name: config.full_service_name(),
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    service_name: String,
}

impl TelemetryGuard {
    /// Service name the subscriber was installed for
    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry...");
    }
}
