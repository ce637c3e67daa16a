//! Telemetry configuration from environment variables.

use serde::{Deserialize, Serialize};
use std::env;

/// Configuration for logging output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) or directives
    pub log_level: String,

    /// Whether to enable console output
    pub console_output: bool,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "lwm2m-bootstrap".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `LWM2M_SERVICE_NAME`: Service name (default: lwm2m-bootstrap)
    /// - `LWM2M_LOG_LEVEL`: Log level (default: info). `RUST_LOG` still wins
    ///   when the subscriber is built.
    /// - `LWM2M_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `LWM2M_JSON_LOGS`: Enable JSON logs (default: false, true in containers)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("LWM2M_SERVICE_NAME")
                .unwrap_or_else(|_| "lwm2m-bootstrap".to_string()),

            log_level: env::var("LWM2M_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("LWM2M_CONSOLE_OUTPUT")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),

            json_logs: env::var("LWM2M_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),
        }
    }

    /// Configuration for a named component, e.g. `bsserver` or `client`.
    pub fn for_component(component: &str) -> Self {
        let mut config = Self::from_env();
        config.service_name = format!("lwm2m-{component}");
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "lwm2m-bootstrap");
        assert_eq!(config.log_level, "info");
        assert!(config.console_output);
        assert!(!config.json_logs);
    }

    #[test]
    fn test_for_component() {
        let config = TelemetryConfig::for_component("bsserver");
        assert_eq!(config.service_name, "lwm2m-bsserver");
    }

    #[test]
    fn test_serde_round_trip_keeps_fields() {
        let config = TelemetryConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"json_logs\":false"));
    }
}
