//! Domain module for the bootstrap server
//!
//! ## Modules
//! - checker: staged validation of configurations before storage
//! - config: per-endpoint bootstrap configuration
//! - render: configuration to downlink requests / object tree
//! - security: credential records and identity matching
//! - session: bootstrap session and its driver-owned progress
//! - tasks: request batches and request outcomes

pub mod checker;
pub mod config;
pub mod render;
pub mod security;
pub mod session;
pub mod tasks;

pub use checker::ConfigurationChecker;
pub use config::{
    AclConfig, BootstrapConfig, BootstrapPskIdentity, DeviceConfig, OscoreObject, ServerConfig,
    ServerSecurity,
};
pub use render::{to_object_tree, to_requests};
pub use security::{check_security_infos, SecurityInfo, SecurityKind};
pub use session::{BootstrapSession, SessionId, SessionProgress};
pub use tasks::{RequestOutcome, Tasks};
