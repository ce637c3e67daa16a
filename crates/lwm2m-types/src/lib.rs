//! # LWM2M Types Crate
//!
//! Vocabulary shared by the bootstrap server and the device side.
//!
//! ## Contents
//!
//! - **Identifiers**: core object and resource ids ([`ids`]) and paths.
//! - **Object trees**: plain-data snapshots of object instances, used both to
//!   describe what the server writes and what the device holds.
//! - **Identities**: transport identities and the caller roles the device
//!   authorizes against.
//! - **Messages**: the uplink bootstrap request, downlink requests and
//!   responses. Wire encoding lives with the transport.
//! - **Server records**: typed servers extracted from a tree, consumed by the
//!   consistency checks.

pub mod errors;
pub mod identity;
pub mod ids;
pub mod message;
pub mod modes;
pub mod node;
pub mod oscore;
pub mod path;
pub mod server_info;

pub use errors::{TypesError, TypesResult};
pub use identity::{CallerRole, Identity};
pub use message::{BootstrapRequest, DownlinkRequest, Link, Response, ResponseCode};
pub use modes::{BindingMode, BindingModes, CertificateUsage, ContentFormat, SecurityMode};
pub use node::{ObjectInstance, ObjectTree, ResourceValue};
pub use oscore::OscoreSetting;
pub use path::LwM2mPath;
pub use server_info::{
    DefaultServersInfoExtractor, ServerCredentials, ServerInfo, ServersInfo, ServersInfoExtractor,
};
