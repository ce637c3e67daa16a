//! # LWM2M Bootstrap Server
//!
//! Provisions LWM2M devices with their Security, Server, ACL and OSCORE
//! instances before they register with a device-management server.
//!
//! ## Architecture
//!
//! ```text
//! Device ──Bootstrap-Request──→ BootstrapServer
//!                                  │
//!                                  ├─ EndpointNameProvider  (who is it?)
//!                                  ├─ SessionAuthorizer      (SecurityStore)
//!                                  ├─ BootstrapConfigStore   (what to write?)
//!                                  │
//!                                  ├─ TaskProvider ──→ Tasks ──→ RequestSender ──→ Device
//!                                  │        ↑                          │
//!                                  │        └──── previous responses ──┘
//!                                  │
//!                                  └─ SessionListener(s) ← SessionEvent
//!                                       (event bus, metrics, custom)
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Validated Storage | A configuration failing the consistency checks is never stored |
//! | 2 | Unique Bootstrap Identity | A (server URI, PSK identity) pair belongs to one endpoint |
//! | 3 | Ordered Requests | Requests are sent one at a time, in batch order |
//! | 4 | One Session per Endpoint | A new session cancels the running one |
//! | 5 | Single Terminal Event | Every authorized session ends with exactly one terminal event |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Configurations, rendering, credential matching, sessions
//! - `ports/` - Port traits (inbound API, outbound SPI)
//! - `service/` - Session orchestration implementing the API
//! - `adapters/` - In-memory stores, authorizers, task providers, listeners
//! - `events/` - Session lifecycle events
//!
//! ## Usage
//!
//! ```ignore
//! use lwm2m_bsserver::{BootstrapServerBuilder, ConfigurationAdmin, InMemoryBootstrapConfigStore};
//!
//! let store = Arc::new(InMemoryBootstrapConfigStore::default());
//! store.add("urn:dev:42", config)?;
//!
//! let server = BootstrapServerBuilder::new(coap_sender)
//!     .config_store(store)
//!     .build()?;
//! let outcome = server.run_session(request, identity).await;
//! ```

pub mod adapters;
pub mod builder;
pub mod domain;
pub mod error;
pub mod events;
pub mod metrics;
pub mod ports;
pub mod service;
pub mod settings;

// Re-export key types for convenience
pub use builder::BootstrapServerBuilder;
pub use domain::{
    AclConfig, BootstrapConfig, BootstrapSession, ConfigurationChecker, DeviceConfig,
    OscoreObject, RequestOutcome, SecurityInfo, SecurityKind, ServerConfig, ServerSecurity,
    SessionId, Tasks,
};
pub use error::{BootstrapError, BootstrapResult, ListenerError, RequestFailure};
pub use events::{FailureCause, SessionEvent};
pub use ports::{
    Authorization, BootstrapApi, BootstrapConfigStore, ConfigurationAdmin, EndpointNameProvider,
    RequestSender, SecurityStore, SessionAuthorizer, SessionListener, SessionOutcome,
    TaskProvider,
};
pub use service::BootstrapServer;
pub use settings::BootstrapServerSettings;

// Re-export adapters
pub use adapters::{
    AllowAllAuthorizer, ConfigStoreTaskProvider, DefaultEndpointNameProvider,
    DiscoveryTaskProvider, InMemoryBootstrapConfigStore, InMemorySecurityStore, MetricsListener,
    SecurityStoreAuthorizer, SessionEventBus, Subscription,
};
