//! # Server Records
//!
//! Typed view of the servers a device is configured for, extracted from the
//! Security (0), Server (1) and OSCORE (21) objects of an object tree.
//!
//! ```text
//! /0/x  bootstrap=true  ──→ ServersInfo.bootstrap
//! /0/y  bootstrap=false ──→ ServersInfo.device_management[short id]
//!          │                    └── lifetime/binding from /1/z where /1/z/0 == /0/y/10
//!          └── /0/y/17 ──→ /21/n (OSCORE context)
//! ```

use crate::errors::{TypesError, TypesResult};
use crate::ids::*;
use crate::modes::{BindingModes, CertificateUsage, SecurityMode};
use crate::node::{ObjectInstance, ObjectTree, ResourceValue};
use crate::oscore::OscoreSetting;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Mode-specific credentials of one server entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerCredentials {
    NoSec,
    Psk {
        identity: Vec<u8>,
        key: Vec<u8>,
    },
    Rpk {
        public_key: Vec<u8>,
        private_key: Vec<u8>,
        server_public_key: Vec<u8>,
    },
    X509 {
        client_certificate: Vec<u8>,
        private_key: Vec<u8>,
        server_certificate: Vec<u8>,
        certificate_usage: CertificateUsage,
    },
    /// Security mode we do not extract credentials for (EST).
    Other,
}

/// One server as seen from the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Security instance the record was read from.
    pub security_instance: u16,
    /// Short server id, 0 when absent (bootstrap server).
    pub server_id: u64,
    pub server_uri: String,
    pub bootstrap: bool,
    pub security_mode: SecurityMode,
    pub credentials: ServerCredentials,
    pub sni: Option<String>,
    /// Set when the entry links to an OSCORE context; credentials are then
    /// not extracted.
    pub oscore: Option<OscoreSetting>,
    /// Device management servers only.
    pub lifetime: Option<u64>,
    pub binding: Option<BindingModes>,
}

/// All server records of a device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServersInfo {
    pub bootstrap: Option<ServerInfo>,
    pub device_management: BTreeMap<u64, ServerInfo>,
}

impl ServersInfo {
    pub fn all(&self) -> impl Iterator<Item = &ServerInfo> {
        self.bootstrap.iter().chain(self.device_management.values())
    }
}

/// Turns an object tree snapshot into typed server records.
pub trait ServersInfoExtractor: Send + Sync {
    /// Returns `Ok(None)` when the Security or Server object is not enabled,
    /// and an error for any incoherent entry.
    fn extract(&self, tree: &ObjectTree) -> TypesResult<Option<ServersInfo>>;
}

/// Strict extractor: the first incoherent entry aborts extraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultServersInfoExtractor;

impl ServersInfoExtractor for DefaultServersInfoExtractor {
    fn extract(&self, tree: &ObjectTree) -> TypesResult<Option<ServersInfo>> {
        if !tree.has_object(SECURITY) || !tree.has_object(SERVER) {
            return Ok(None);
        }

        let mut infos = ServersInfo::default();
        for security in tree.instances(SECURITY) {
            if security.require_bool(SEC_BOOTSTRAP)? {
                if infos.bootstrap.is_some() {
                    debug!(instance = security.id, "duplicate bootstrap security entry");
                    return Err(TypesError::DuplicateBootstrapServer);
                }
                infos.bootstrap = Some(read_server_info(tree, security, true)?);
            } else {
                let mut info = read_server_info(tree, security, false)?;
                let server = find_server_instance(tree, info.server_id)?;
                info.lifetime = Some(server.require_u64(SRV_LIFETIME)?);
                info.binding = Some(server.require_string(SRV_BINDING)?.parse()?);
                infos.device_management.insert(info.server_id, info);
            }
        }
        Ok(Some(infos))
    }
}

fn find_server_instance(tree: &ObjectTree, short_id: u64) -> TypesResult<&ObjectInstance> {
    for server in tree.instances(SERVER) {
        if server.require_u64(SRV_SERVER_ID)? == short_id {
            return Ok(server);
        }
    }
    Err(TypesError::MissingServerInstance { short_id })
}

fn read_server_info(
    tree: &ObjectTree,
    security: &ObjectInstance,
    bootstrap: bool,
) -> TypesResult<ServerInfo> {
    let server_id = match security.get(SEC_SERVER_ID) {
        None => 0,
        Some(_) => security.require_u64(SEC_SERVER_ID)?,
    };
    let security_mode = SecurityMode::from_code(security.require_i64(SEC_SECURITY_MODE)?)?;
    let oscore = resolve_oscore(tree, security)?;

    let credentials = if oscore.is_some() {
        ServerCredentials::NoSec
    } else {
        read_credentials(security, security_mode)?
    };

    Ok(ServerInfo {
        security_instance: security.id,
        server_id,
        server_uri: security.require_string(SEC_SERVER_URI)?.to_string(),
        bootstrap,
        security_mode,
        credentials,
        sni: security.optional_string(SEC_SNI)?.map(str::to_string),
        oscore,
        lifetime: None,
        binding: None,
    })
}

fn read_credentials(security: &ObjectInstance, mode: SecurityMode) -> TypesResult<ServerCredentials> {
    Ok(match mode {
        SecurityMode::NoSec => ServerCredentials::NoSec,
        SecurityMode::Psk => ServerCredentials::Psk {
            identity: security.opaque_or_empty(SEC_PUBKEY_IDENTITY)?,
            key: security.opaque_or_empty(SEC_SECRET_KEY)?,
        },
        SecurityMode::Rpk => ServerCredentials::Rpk {
            public_key: security.opaque_or_empty(SEC_PUBKEY_IDENTITY)?,
            private_key: security.opaque_or_empty(SEC_SECRET_KEY)?,
            server_public_key: security.opaque_or_empty(SEC_SERVER_PUBKEY)?,
        },
        SecurityMode::X509 => ServerCredentials::X509 {
            client_certificate: security.opaque_or_empty(SEC_PUBKEY_IDENTITY)?,
            private_key: security.opaque_or_empty(SEC_SECRET_KEY)?,
            server_certificate: security.opaque_or_empty(SEC_SERVER_PUBKEY)?,
            certificate_usage: match security.optional_i64(SEC_CERTIFICATE_USAGE)? {
                Some(code) => CertificateUsage::from_code(code)?,
                None => CertificateUsage::default(),
            },
        },
        SecurityMode::Est => ServerCredentials::Other,
    })
}

fn resolve_oscore(tree: &ObjectTree, security: &ObjectInstance) -> TypesResult<Option<OscoreSetting>> {
    let (object_id, instance_id) = match security.get(SEC_OSCORE_SECURITY_MODE) {
        Some(ResourceValue::ObjectLink {
            object_id,
            instance_id,
        }) => (*object_id, *instance_id),
        Some(_) => {
            return Err(TypesError::InvalidResourceType {
                object_id: SECURITY,
                instance_id: security.id,
                resource_id: SEC_OSCORE_SECURITY_MODE,
                expected: "object link",
            })
        }
        None => return Ok(None),
    };

    // 65535:65535 is the null link
    if object_id == u16::MAX && instance_id == u16::MAX {
        return Ok(None);
    }
    if object_id != OSCORE {
        return Err(TypesError::InvalidObjectLink {
            security_instance: security.id,
            object_id,
        });
    }
    let oscore = tree
        .instance(OSCORE, instance_id)
        .ok_or(TypesError::MissingOscoreInstance {
            security_instance: security.id,
            oscore_instance: instance_id,
        })?;

    Ok(Some(OscoreSetting {
        master_secret: oscore.opaque_or_empty(OSCORE_MASTER_SECRET)?,
        sender_id: oscore.opaque_or_empty(OSCORE_SENDER_ID)?,
        recipient_id: oscore.opaque_or_empty(OSCORE_RECIPIENT_ID)?,
        aead_algorithm: oscore
            .optional_i64(OSCORE_AEAD_ALGORITHM)?
            .unwrap_or(crate::oscore::DEFAULT_AEAD_ALGORITHM),
        hkdf_algorithm: oscore
            .optional_i64(OSCORE_HMAC_ALGORITHM)?
            .unwrap_or(crate::oscore::DEFAULT_HKDF_ALGORITHM),
        master_salt: oscore.opaque_or_empty(OSCORE_MASTER_SALT)?,
    }))
}
