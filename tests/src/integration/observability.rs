//! # Observability Flows
//!
//! Sessions run with the metrics listener attached and the global
//! subscriber installed; the Prometheus exposition reflects them.

#[cfg(test)]
mod tests {
    use crate::integration::device::SimulatedDevice;
    use crate::integration::fixtures::*;
    use lwm2m_bsserver::{
        BootstrapConfigStore, BootstrapServerBuilder, ConfigurationAdmin, InMemoryBootstrapConfigStore,
        MetricsListener, SessionOutcome,
    };
    use lwm2m_telemetry::{encode_metrics, init_logging, TelemetryConfig, TelemetryError};
    use lwm2m_types::{BootstrapRequest, Identity};
    use std::sync::Arc;

    fn init_test_logging() {
        let config = TelemetryConfig {
            console_output: false,
            ..TelemetryConfig::for_component("tests")
        };
        match init_logging(&config) {
            // keep the subscriber for the rest of the process
            Ok(guard) => std::mem::forget(guard),
            Err(TelemetryError::AlreadyInitialized(_)) => {}
            Err(e) => panic!("logging setup failed: {e}"),
        }
    }

    #[tokio::test]
    async fn test_session_outcomes_are_exported() -> anyhow::Result<()> {
        init_test_logging();

        let device = Arc::new(SimulatedDevice::new(factory_tree()));
        let store = Arc::new(InMemoryBootstrapConfigStore::default());
        store.add(ENDPOINT, bootstrap_config())?;
        let server = BootstrapServerBuilder::new(device.clone())
            .config_store(store)
            .listener(Arc::new(MetricsListener))
            .build()?;

        assert!(device.handler.try_init_session());
        let outcome = server
            .run_session(BootstrapRequest::new(ENDPOINT), Identity::Unsecure)
            .await;
        assert_eq!(outcome, SessionOutcome::Succeeded);
        device.handler.close_session();

        let outcome = server
            .run_session(BootstrapRequest::new("urn:dev:unknown"), Identity::Unsecure)
            .await;
        assert_eq!(outcome, SessionOutcome::NoConfig);

        let text = encode_metrics()?;
        assert!(text.contains("lwm2m_bootstrap_sessions_started_total"));
        assert!(text.contains(r#"lwm2m_bootstrap_sessions_total{outcome="succeeded"}"#));
        assert!(text.contains(r#"lwm2m_bootstrap_sessions_total{outcome="no_config"}"#));
        assert!(text.contains(r#"lwm2m_bootstrap_requests_total{outcome="success"}"#));
        Ok(())
    }
}
