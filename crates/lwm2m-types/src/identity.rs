//! # Transport Identities
//!
//! Who is on the other end of the wire, as established by the transport
//! security layer, and which role a caller plays towards the device.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a peer as authenticated by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Identity {
    /// Plain transport, nothing authenticated.
    Unsecure,
    /// DTLS pre-shared key identity.
    Psk { identity: String },
    /// DTLS raw public key (SubjectPublicKeyInfo DER).
    Rpk { public_key: Vec<u8> },
    /// DTLS X.509, reduced to the certificate subject common name.
    X509 { common_name: String },
    /// OSCORE context, identified by the recipient id seen from our side.
    Oscore { recipient_id: Vec<u8> },
}

impl Identity {
    pub fn psk(identity: impl Into<String>) -> Self {
        Self::Psk {
            identity: identity.into(),
        }
    }

    pub fn x509(common_name: impl Into<String>) -> Self {
        Self::X509 {
            common_name: common_name.into(),
        }
    }

    pub fn is_secure(&self) -> bool {
        !matches!(self, Self::Unsecure)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsecure => write!(f, "unsecure"),
            Self::Psk { identity } => write!(f, "psk:{identity}"),
            Self::Rpk { public_key } => write!(f, "rpk:{}", hex::encode(public_key)),
            Self::X509 { common_name } => write!(f, "x509:{common_name}"),
            Self::Oscore { recipient_id } => write!(f, "oscore:{}", hex::encode(recipient_id)),
        }
    }
}

/// Role of a caller issuing a downlink request to the device.
///
/// Authorization on the device is decided by role rather than raw identity:
/// during bootstrap the device may not know the final identity of the
/// bootstrap server yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallerRole {
    /// Local caller on the device itself.
    System,
    /// The designated bootstrap authority.
    BootstrapServer,
    /// A device management server.
    DeviceManagement { short_server_id: u16 },
}

impl CallerRole {
    pub fn is_bootstrap_server(&self) -> bool {
        matches!(self, Self::BootstrapServer)
    }
}
