//! # Bootstrap Metrics
//!
//! Prometheus metrics for monitoring bootstrap sessions.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! lwm2m-bsserver = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `lwm2m_bootstrap_sessions_started_total` - Counter of bootstrap requests received
//! - `lwm2m_bootstrap_sessions_total` - Counter of finished attempts (by outcome)
//! - `lwm2m_bootstrap_requests_total` - Counter of downlink requests (by outcome)
//! - `lwm2m_bootstrap_active_sessions` - Gauge of sessions currently running

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, IntCounter, IntCounterVec,
    IntGauge,
};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Bootstrap requests received
    pub static ref SESSIONS_STARTED: IntCounter = register_int_counter!(
        "lwm2m_bootstrap_sessions_started_total",
        "Total number of bootstrap requests received"
    )
    .expect("Failed to create SESSIONS_STARTED metric");

    /// Finished bootstrap attempts, labeled by outcome
    pub static ref SESSIONS: IntCounterVec = register_int_counter_vec!(
        "lwm2m_bootstrap_sessions_total",
        "Total number of finished bootstrap attempts",
        &["outcome"]
    )
    .expect("Failed to create SESSIONS metric");

    /// Downlink requests, labeled by outcome
    pub static ref REQUESTS: IntCounterVec = register_int_counter_vec!(
        "lwm2m_bootstrap_requests_total",
        "Total number of downlink requests sent to devices",
        &["outcome"]
    )
    .expect("Failed to create REQUESTS metric");

    /// Sessions currently running
    pub static ref ACTIVE_SESSIONS: IntGauge = register_int_gauge!(
        "lwm2m_bootstrap_active_sessions",
        "Number of bootstrap sessions currently running"
    )
    .expect("Failed to create ACTIVE_SESSIONS metric");
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

/// Record a bootstrap request received
#[cfg(feature = "metrics")]
pub fn record_session_started() {
    SESSIONS_STARTED.inc();
}

/// Record a finished bootstrap attempt
#[cfg(feature = "metrics")]
pub fn record_session_outcome(outcome: &str) {
    SESSIONS.with_label_values(&[outcome]).inc();
}

/// Record a downlink request outcome
#[cfg(feature = "metrics")]
pub fn record_request_outcome(outcome: &str) {
    REQUESTS.with_label_values(&[outcome]).inc();
}

/// Track running sessions
#[cfg(feature = "metrics")]
pub fn adjust_active_sessions(delta: i64) {
    ACTIVE_SESSIONS.add(delta);
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_session_started() {}

#[cfg(not(feature = "metrics"))]
pub fn record_session_outcome(_outcome: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_request_outcome(_outcome: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn adjust_active_sessions(_delta: i64) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_callable_with_or_without_feature() {
        record_session_started();
        record_session_outcome("succeeded");
        record_request_outcome("success");
        adjust_active_sessions(1);
        adjust_active_sessions(-1);
    }
}
