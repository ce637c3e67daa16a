//! Builder wiring the bootstrap server from its ports.

use crate::adapters::{
    AllowAllAuthorizer, DefaultEndpointNameProvider, DiscoveryTaskProvider,
    InMemoryBootstrapConfigStore, ListenerDispatcher, SecurityStoreAuthorizer,
};
use crate::error::BootstrapResult;
use crate::ports::{
    BootstrapConfigStore, EndpointNameProvider, RequestSender, SecurityStore, SessionAuthorizer,
    SessionListener, TaskProvider,
};
use crate::service::BootstrapServer;
use crate::settings::BootstrapServerSettings;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Builds a [`BootstrapServer`]. Only the request sender is mandatory.
///
/// | Port                | Default                                     |
/// |---------------------|---------------------------------------------|
/// | configuration store | empty [`InMemoryBootstrapConfigStore`]      |
/// | authorizer          | security store backed, else allow-all       |
/// | endpoint names      | [`DefaultEndpointNameProvider`]             |
/// | task provider       | [`DiscoveryTaskProvider`] over the store    |
pub struct BootstrapServerBuilder {
    settings: BootstrapServerSettings,
    config_store: Option<Arc<dyn BootstrapConfigStore>>,
    security_store: Option<Arc<dyn SecurityStore>>,
    authorizer: Option<Arc<dyn SessionAuthorizer>>,
    endpoint_provider: Option<Arc<dyn EndpointNameProvider>>,
    task_provider: Option<Arc<dyn TaskProvider>>,
    sender: Arc<dyn RequestSender>,
    listeners: Vec<Arc<dyn SessionListener>>,
}

impl BootstrapServerBuilder {
    pub fn new(sender: Arc<dyn RequestSender>) -> Self {
        Self {
            settings: BootstrapServerSettings::default(),
            config_store: None,
            security_store: None,
            authorizer: None,
            endpoint_provider: None,
            task_provider: None,
            sender,
            listeners: Vec::new(),
        }
    }

    pub fn settings(mut self, settings: BootstrapServerSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn config_store(mut self, store: Arc<dyn BootstrapConfigStore>) -> Self {
        self.config_store = Some(store);
        self
    }

    pub fn security_store(mut self, store: Arc<dyn SecurityStore>) -> Self {
        self.security_store = Some(store);
        self
    }

    /// Replaces the security-store based authorization.
    pub fn authorizer(mut self, authorizer: Arc<dyn SessionAuthorizer>) -> Self {
        self.authorizer = Some(authorizer);
        self
    }

    pub fn endpoint_name_provider(mut self, provider: Arc<dyn EndpointNameProvider>) -> Self {
        self.endpoint_provider = Some(provider);
        self
    }

    pub fn task_provider(mut self, provider: Arc<dyn TaskProvider>) -> Self {
        self.task_provider = Some(provider);
        self
    }

    pub fn listener(mut self, listener: Arc<dyn SessionListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    pub fn build(self) -> BootstrapResult<BootstrapServer> {
        self.settings.validate()?;

        let config_store: Arc<dyn BootstrapConfigStore> = self.config_store.unwrap_or_else(|| {
            debug!("No configuration store given, using an empty in-memory store");
            Arc::new(InMemoryBootstrapConfigStore::default())
        });
        let authorizer: Arc<dyn SessionAuthorizer> = match (self.authorizer, self.security_store) {
            (Some(authorizer), _) => authorizer,
            (None, Some(store)) => Arc::new(SecurityStoreAuthorizer::new(store)),
            (None, None) => {
                debug!("No security store given, every device is authorized");
                Arc::new(AllowAllAuthorizer)
            }
        };
        let task_provider: Arc<dyn TaskProvider> = self
            .task_provider
            .unwrap_or_else(|| Arc::new(DiscoveryTaskProvider::new(config_store.clone())));

        let dispatcher = Arc::new(ListenerDispatcher::new());
        for listener in self.listeners {
            dispatcher.add(listener);
        }

        Ok(BootstrapServer {
            settings: self.settings,
            config_store,
            authorizer,
            endpoint_provider: self
                .endpoint_provider
                .unwrap_or_else(|| Arc::new(DefaultEndpointNameProvider)),
            task_provider,
            sender: self.sender,
            dispatcher,
            sessions: Mutex::new(HashMap::new()),
        })
    }
}
