//! Adapters module for the bootstrap server
//!
//! Default implementations of the outbound ports.

pub mod authorizer;
pub mod config_store;
pub mod dispatcher;
pub mod event_bus;
pub mod metrics_listener;
pub mod security_store;
pub mod task_provider;

pub use authorizer::{AllowAllAuthorizer, DefaultEndpointNameProvider, SecurityStoreAuthorizer};
pub use config_store::InMemoryBootstrapConfigStore;
pub use dispatcher::ListenerDispatcher;
pub use event_bus::{SessionEventBus, Subscription, SubscriptionError};
pub use metrics_listener::MetricsListener;
pub use security_store::InMemorySecurityStore;
pub use task_provider::{ConfigStoreTaskProvider, DiscoveryTaskProvider};
