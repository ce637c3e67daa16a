//! # LWM2M Telemetry
//!
//! Logging setup and metrics exposition shared by the bootstrap server and
//! the device side.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lwm2m_telemetry::{init_logging, TelemetryConfig};
//!
//! let config = TelemetryConfig::for_component("bsserver");
//! let _guard = init_logging(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LWM2M_SERVICE_NAME` | `lwm2m-bootstrap` | Service name in logs |
//! | `LWM2M_LOG_LEVEL` | `info` | Log level filter (`RUST_LOG` wins) |
//! | `LWM2M_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `LWM2M_JSON_LOGS` | `false` | JSON formatted logs |

mod config;
mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use logging::{build_filter, init_logging, LoggingGuard};
pub use metrics::encode_metrics;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Global subscriber already initialized: {0}")]
    AlreadyInitialized(String),

    #[error("Failed to encode metrics: {0}")]
    Metrics(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
