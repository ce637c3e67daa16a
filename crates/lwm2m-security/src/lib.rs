//! # LWM2M Security Checks
//!
//! Credential well-formedness checks shared by the bootstrap server (before a
//! configuration is stored) and the device (after a bootstrap session ends).
//!
//! ## Modules
//!
//! - [`certificate`]: X.509 key usage / extended key usage / CA checks
//! - [`oscore`]: OSCORE context validation
//! - [`credentials`]: per-server record checks
//! - [`consistency`]: staged pipeline composing the above over an object tree

pub mod certificate;
pub mod consistency;
pub mod credentials;
pub mod errors;
pub mod oscore;

pub use certificate::{check_usage, CertificateRole, MAX_CERT_SIZE};
pub use consistency::{ConsistencyPipeline, ServerCheck, Stage, TreeCheck};
pub use credentials::{check_key_material, check_server_info};
pub use errors::{SecurityError, SecurityResult};
pub use oscore::validate_oscore_setting;
