//! Ports module for the bootstrap server

pub mod inbound;
pub mod outbound;

pub use inbound::{BootstrapApi, ConfigurationAdmin, SessionOutcome};
pub use outbound::{
    Authorization, BootstrapConfigStore, EndpointNameProvider, RequestSender, SecurityStore,
    SessionAuthorizer, SessionListener, TaskProvider,
};
