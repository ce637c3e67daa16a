//! Prometheus text exposition of the default registry.
//!
//! Components register their collectors with `prometheus::register_*!`
//! macros; this module only renders what is registered.

use crate::TelemetryError;
use prometheus::{Encoder, TextEncoder};

/// Encode all registered metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::Metrics(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::{register_int_counter, IntCounter};

    #[test]
    fn test_registered_counter_is_encoded() {
        let counter: IntCounter = register_int_counter!(
            "lwm2m_telemetry_test_total",
            "Counter used by the exposition test"
        )
        .unwrap();
        counter.inc();
        let text = encode_metrics().unwrap();
        assert!(text.contains("lwm2m_telemetry_test_total 1"));
    }
}
