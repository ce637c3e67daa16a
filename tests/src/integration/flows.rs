//! # Integration Test Flows
//!
//! Full bootstrap sessions between the orchestrator and a simulated device.
//!
//! ## Flows Tested:
//!
//! 1. **Discovery bootstrap**: discover, delete stale servers, write the
//!    configuration, finish; the device ends consistent.
//! 2. **Rejected finish**: the device refuses an inconsistent result.
//! 3. **Device outside a session**: deletes and finish are refused.
//! 4. **PSK authorization**: only the registered identity is served.
//! 5. **Admin exchange**: configurations move between stores as JSON.

#[cfg(test)]
mod tests {
    use crate::integration::device::SimulatedDevice;
    use crate::integration::fixtures::*;
    use lwm2m_bsserver::{
        BootstrapConfigStore, BootstrapServer, BootstrapServerBuilder, BootstrapServerSettings,
        ConfigStoreTaskProvider, ConfigurationAdmin, FailureCause, InMemoryBootstrapConfigStore,
        InMemorySecurityStore, SecurityInfo, ServerSecurity, SessionEvent, SessionEventBus,
        SessionOutcome, Subscription,
    };
    use lwm2m_client::{ConsistencyChecker, ObjectTreeAccessor, WaitError};
    use lwm2m_types::ids::*;
    use lwm2m_types::{BootstrapRequest, CallerRole, Identity, LwM2mPath, ResourceValue};
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use std::thread::{self, JoinHandle};
    use std::time::Duration;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn store() -> anyhow::Result<Arc<InMemoryBootstrapConfigStore>> {
        let store = Arc::new(InMemoryBootstrapConfigStore::default());
        store.add(ENDPOINT, bootstrap_config())?;
        Ok(store)
    }

    fn server(
        device: &Arc<SimulatedDevice>,
        store: Arc<InMemoryBootstrapConfigStore>,
        bus: &Arc<SessionEventBus>,
    ) -> anyhow::Result<BootstrapServer> {
        Ok(BootstrapServerBuilder::new(device.clone())
            .config_store(store)
            .listener(bus.clone())
            .build()?)
    }

    /// Device side of the exchange: waits for the end of the session on its
    /// own thread, as a registration engine does.
    fn wait_for_finish(
        device: &Arc<SimulatedDevice>,
        timeout: Duration,
    ) -> JoinHandle<Result<bool, WaitError>> {
        let handler = device.handler.clone();
        thread::spawn(move || handler.wait_bootstrap_finished(timeout))
    }

    fn drain(subscription: &mut Subscription) -> anyhow::Result<Vec<&'static str>> {
        let mut names = Vec::new();
        while let Some(event) = subscription.try_recv()? {
            names.push(event.name());
        }
        Ok(names)
    }

    fn count(names: &[&str], name: &str) -> usize {
        names.iter().filter(|n| **n == name).count()
    }

    // =============================================================================
    // FLOWS
    // =============================================================================

    #[tokio::test]
    async fn test_discovery_bootstrap_end_to_end() -> anyhow::Result<()> {
        let device = Arc::new(SimulatedDevice::new(factory_tree()));
        let bus = Arc::new(SessionEventBus::from_settings(&BootstrapServerSettings::default()));
        let mut events = bus.subscribe_endpoint(ENDPOINT);
        let server = server(&device, store()?, &bus)?;

        assert!(device.handler.try_init_session());
        let waiter = wait_for_finish(&device, Duration::from_secs(5));

        let outcome = server
            .run_session(BootstrapRequest::new(ENDPOINT), Identity::Unsecure)
            .await;
        assert_eq!(outcome, SessionOutcome::Succeeded);
        assert_eq!(waiter.join().expect("waiter panicked"), Ok(true));
        device.handler.close_session();

        let paths: Vec<String> = device
            .objects
            .snapshot()
            .instance_paths()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(paths, vec!["/0/0", "/0/1", "/1/0", "/3/0"]);
        // bootstrap entry rewritten in place
        assert_eq!(
            device.objects.read(&LwM2mPath::resource(SECURITY, 0, SEC_SERVER_URI)),
            Some(ResourceValue::String(BS_URI.into()))
        );
        assert_eq!(
            device.objects.read(&LwM2mPath::resource(SERVER, 0, SRV_SERVER_ID)),
            Some(ResourceValue::UnsignedInteger(DM_SHORT_ID.into()))
        );
        assert_eq!(ConsistencyChecker::default().check(device.objects.as_ref()), None);

        // discover, 2 stale deletes, 3 writes, finish
        let names = drain(&mut events)?;
        assert_eq!(names.first(), Some(&"session_initiated"));
        assert_eq!(names.last(), Some(&"end"));
        assert_eq!(count(&names, "send_request"), 7);
        assert_eq!(count(&names, "response_success"), 7);
        Ok(())
    }

    #[tokio::test]
    async fn test_inconsistent_device_rejects_finish() -> anyhow::Result<()> {
        let mut tree = factory_tree();
        if let Some(device) = tree.instance_mut(DEVICE, 0) {
            device.resources.remove(&DEV_SUPPORTED_BINDING);
        }
        let device = Arc::new(SimulatedDevice::new(tree));
        let store = store()?;
        let server = BootstrapServerBuilder::new(device.clone())
            .config_store(store.clone())
            .task_provider(Arc::new(ConfigStoreTaskProvider::new(store)))
            .build()?;

        assert!(device.handler.try_init_session());
        let waiter = wait_for_finish(&device, Duration::from_millis(200));

        let outcome = server
            .run_session(BootstrapRequest::new(ENDPOINT), Identity::Unsecure)
            .await;
        assert_eq!(outcome, SessionOutcome::Failed(FailureCause::FinishFailed));
        assert_eq!(waiter.join().expect("waiter panicked"), Ok(false));
        assert!(device.handler.is_bootstrapping());
        Ok(())
    }

    #[tokio::test]
    async fn test_device_outside_session_refuses_delete_and_finish() -> anyhow::Result<()> {
        let device = Arc::new(SimulatedDevice::new(factory_tree()));
        let mut config = bootstrap_config();
        config.to_delete = vec![LwM2mPath::Root];
        let store = Arc::new(InMemoryBootstrapConfigStore::default());
        store.add(ENDPOINT, config)?;
        let bus = Arc::new(SessionEventBus::default());
        let mut events = bus.subscribe();
        let server = server(&device, store, &bus)?;

        let outcome = server
            .run_session(BootstrapRequest::new(ENDPOINT), Identity::Unsecure)
            .await;
        assert_eq!(outcome, SessionOutcome::Failed(FailureCause::FinishFailed));

        let names = drain(&mut events)?;
        // the refused delete does not stop the session
        assert!(count(&names, "response_error") >= 1);
        assert!(count(&names, "response_success") >= 1);
        assert_eq!(names.last(), Some(&"failed"));
        assert_eq!(device.objects.snapshot().instance_count(SECURITY), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_management_server_cannot_bootstrap() -> anyhow::Result<()> {
        let device = Arc::new(
            SimulatedDevice::new(factory_tree()).seen_as(CallerRole::DeviceManagement {
                short_server_id: 5,
            }),
        );
        let bus = Arc::new(SessionEventBus::default());
        let server = server(&device, store()?, &bus)?;

        assert!(device.handler.try_init_session());
        let outcome = server
            .run_session(BootstrapRequest::new(ENDPOINT), Identity::Unsecure)
            .await;
        assert_eq!(outcome, SessionOutcome::Failed(FailureCause::FinishFailed));
        assert_eq!(device.objects.snapshot(), factory_tree());
        Ok(())
    }

    #[tokio::test]
    async fn test_psk_authorization() -> anyhow::Result<()> {
        let device = Arc::new(SimulatedDevice::new(factory_tree()));
        let security = Arc::new(InMemorySecurityStore::new());
        security.add(SecurityInfo::psk(ENDPOINT, "imei-518", vec![0x5E, 0xC2]))?;
        let bus = Arc::new(SessionEventBus::default());
        let mut events = bus.subscribe();
        let server = BootstrapServerBuilder::new(device.clone())
            .config_store(store()?)
            .security_store(security)
            .listener(bus.clone())
            .build()?;

        let outcome = server
            .run_session(BootstrapRequest::new(ENDPOINT), Identity::psk("someone-else"))
            .await;
        assert_eq!(outcome, SessionOutcome::Declined);
        assert_eq!(drain(&mut events)?, vec!["session_initiated", "unauthorized"]);

        assert!(device.handler.try_init_session());
        let outcome = server
            .run_session(BootstrapRequest::new(ENDPOINT), Identity::psk("imei-518"))
            .await;
        assert_eq!(outcome, SessionOutcome::Succeeded);
        match events.try_recv()? {
            Some(SessionEvent::SessionInitiated { identity, .. }) => {
                assert_eq!(identity, Identity::psk("imei-518"))
            }
            other => anyhow::bail!("unexpected first event: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_configurations_move_between_stores_as_json() -> anyhow::Result<()> {
        let source = store()?;
        let configs: BTreeMap<String, _> = source
            .get_all()
            .into_iter()
            .map(|(endpoint, config)| (endpoint, (*config).clone()))
            .collect();
        let exported = serde_json::to_string(&configs)?;

        let target = InMemoryBootstrapConfigStore::default();
        for (endpoint, config) in configs_from_json(&exported)? {
            target.add(&endpoint, config)?;
        }
        assert_eq!(target.get(ENDPOINT), source.get(ENDPOINT));

        // identity bookkeeping travels with the imported configuration
        let mut other = bootstrap_config();
        other
            .security
            .insert(0, ServerSecurity::psk(BS_URI, true, "shared-id", vec![1]));
        target.add("urn:dev:a", other.clone())?;
        assert!(target.add("urn:dev:b", other).is_err());
        Ok(())
    }
}
