//! # XC Telemetry
//!
//! Structured logging for the escrow services.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use xc_telemetry::{init_tracing, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_tracing(&config).expect("Failed to init tracing");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `ESCROW_SERVICE_NAME` | `xc-escrow` | Service name in log lines |
//! | `ESCROW_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `ESCROW_JSON_LOGS` | `false` | JSON formatted output |

#![warn(missing_docs)]

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::init_tracing;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The log filter directive could not be parsed.
    #[error("Invalid log filter: {0}")]
    Filter(String),

    /// A global subscriber is already installed.
    #[error("Failed to install subscriber: {0}")]
    SubscriberInit(String),
}
