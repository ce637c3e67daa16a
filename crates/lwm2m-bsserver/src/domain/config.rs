//! # Bootstrap Configuration
//!
//! Per-endpoint provisioning record: what the bootstrap server deletes and
//! writes on the device. Instance ids are the keys of each map.

use lwm2m_types::{
    BindingModes, CertificateUsage, ContentFormat, LwM2mPath, SecurityMode,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bootstrap configuration of one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Let the server pick Security instance ids, keeping the device's
    /// current bootstrap-server instance where it is.
    #[serde(default)]
    pub auto_id_for_security_object: bool,

    /// Content format override for every write of the session.
    #[serde(default)]
    pub content_format: Option<ContentFormat>,

    /// Paths deleted before anything is written.
    #[serde(default)]
    pub to_delete: Vec<LwM2mPath>,

    /// Server object (1) instances.
    #[serde(default)]
    pub servers: BTreeMap<u16, ServerConfig>,

    /// Security object (0) instances.
    #[serde(default)]
    pub security: BTreeMap<u16, ServerSecurity>,

    /// Access Control object (2) instances.
    #[serde(default)]
    pub acls: BTreeMap<u16, AclConfig>,

    /// OSCORE object (21) instances.
    #[serde(default)]
    pub oscore: BTreeMap<u16, OscoreObject>,

    /// Device this configuration is meant for. Checked, never written:
    /// the Device object is not bootstrap-writable.
    #[serde(default)]
    pub device: Option<DeviceConfig>,
}

/// Server object instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub short_id: u16,
    pub lifetime: u64,
    pub default_min_period: Option<u64>,
    pub default_max_period: Option<u64>,
    pub disable_timeout: Option<u64>,
    pub notify_if_disabled: bool,
    pub binding: BindingModes,
}

impl ServerConfig {
    pub fn new(short_id: u16, binding: BindingModes) -> Self {
        Self {
            short_id,
            lifetime: 86400,
            default_min_period: Some(1),
            default_max_period: None,
            disable_timeout: None,
            notify_if_disabled: true,
            binding,
        }
    }
}

/// Security object instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSecurity {
    pub uri: String,
    pub bootstrap_server: bool,
    pub security_mode: SecurityMode,
    /// PSK identity, RPK public key or X.509 client certificate.
    #[serde(default)]
    pub public_key_or_id: Vec<u8>,
    /// RPK or X.509 server key material.
    #[serde(default)]
    pub server_public_key: Vec<u8>,
    /// PSK key or client private key.
    #[serde(default)]
    pub secret_key: Vec<u8>,
    pub server_id: Option<u16>,
    pub client_old_off_time: Option<u64>,
    pub bootstrap_server_account_timeout: Option<u64>,
    pub sni: Option<String>,
    pub certificate_usage: Option<CertificateUsage>,
    /// Instance id of the OSCORE object this entry uses.
    pub oscore_security_mode: Option<u16>,
}

impl ServerSecurity {
    /// Unsecured entry for `uri`.
    pub fn no_sec(uri: impl Into<String>, bootstrap_server: bool) -> Self {
        Self {
            uri: uri.into(),
            bootstrap_server,
            security_mode: SecurityMode::NoSec,
            public_key_or_id: Vec::new(),
            server_public_key: Vec::new(),
            secret_key: Vec::new(),
            server_id: None,
            client_old_off_time: Some(1),
            bootstrap_server_account_timeout: Some(0),
            sni: None,
            certificate_usage: None,
            oscore_security_mode: None,
        }
    }

    /// PSK entry for `uri`.
    pub fn psk(
        uri: impl Into<String>,
        bootstrap_server: bool,
        identity: impl Into<String>,
        key: Vec<u8>,
    ) -> Self {
        Self {
            security_mode: SecurityMode::Psk,
            public_key_or_id: identity.into().into_bytes(),
            secret_key: key,
            ..Self::no_sec(uri, bootstrap_server)
        }
    }

    pub fn with_server_id(mut self, server_id: u16) -> Self {
        self.server_id = Some(server_id);
        self
    }

    /// PSK identity as text, when this entry uses PSK.
    pub fn psk_identity(&self) -> Option<String> {
        (self.security_mode == SecurityMode::Psk)
            .then(|| String::from_utf8_lossy(&self.public_key_or_id).into_owned())
    }
}

/// Access Control object instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclConfig {
    pub object_id: u16,
    pub object_instance_id: u16,
    /// Short server id to access rights bitmask.
    #[serde(default)]
    pub acls: BTreeMap<u16, u64>,
    pub access_control_owner: Option<u16>,
}

/// OSCORE object instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OscoreObject {
    pub master_secret: Vec<u8>,
    pub sender_id: Vec<u8>,
    pub recipient_id: Vec<u8>,
    pub aead_algorithm: Option<i64>,
    pub hmac_algorithm: Option<i64>,
    #[serde(default)]
    pub master_salt: Vec<u8>,
}

/// Device the configuration targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Supported binding modes as reported in `/3/0/16`, e.g. `"UQ"`.
    pub supported_binding: Option<String>,
    pub manufacturer: Option<String>,
    pub model_number: Option<String>,
}

impl DeviceConfig {
    pub fn with_binding(binding: impl Into<String>) -> Self {
        Self {
            supported_binding: Some(binding.into()),
            manufacturer: None,
            model_number: None,
        }
    }
}

/// PSK identity the device uses towards the bootstrap server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BootstrapPskIdentity {
    pub server_uri: String,
    pub psk_identity: String,
}

impl BootstrapConfig {
    /// `(serverUri, pskIdentity)` of the PSK bootstrap-server entry, if any.
    pub fn bootstrap_psk_identity(&self) -> Option<BootstrapPskIdentity> {
        self.security
            .values()
            .filter(|s| s.bootstrap_server)
            .find_map(|s| {
                s.psk_identity().map(|psk_identity| BootstrapPskIdentity {
                    server_uri: s.uri.clone(),
                    psk_identity,
                })
            })
    }

    /// The bootstrap-server security entry, if any.
    pub fn bootstrap_security(&self) -> Option<(u16, &ServerSecurity)> {
        self.security
            .iter()
            .find(|(_, s)| s.bootstrap_server)
            .map(|(id, s)| (*id, s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_psk_identity_only_for_bootstrap_entry() {
        let mut config = BootstrapConfig::default();
        config.security.insert(
            1,
            ServerSecurity::psk("coaps://dm:5684", false, "dm-id", vec![1]).with_server_id(1),
        );
        assert!(config.bootstrap_psk_identity().is_none());

        config.security.insert(
            0,
            ServerSecurity::psk("coaps://bs:5684", true, "bs-id", vec![1]),
        );
        let identity = config.bootstrap_psk_identity().unwrap();
        assert_eq!(identity.server_uri, "coaps://bs:5684");
        assert_eq!(identity.psk_identity, "bs-id");
    }

    #[test]
    fn test_config_is_serde_friendly() {
        let json = r#"{
            "servers": { "0": { "short_id": 1, "lifetime": 300, "default_min_period": null,
                "default_max_period": null, "disable_timeout": null,
                "notify_if_disabled": true, "binding": ["U"] } },
            "security": { "1": { "uri": "coap://dm:5683", "bootstrap_server": false,
                "security_mode": "NoSec", "server_id": 1, "client_old_off_time": null,
                "bootstrap_server_account_timeout": null, "sni": null,
                "certificate_usage": null, "oscore_security_mode": null } }
        }"#;
        let config: BootstrapConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.servers[&0].short_id, 1);
        assert_eq!(config.security[&1].security_mode, SecurityMode::NoSec);
        assert!(config.to_delete.is_empty());
    }
}
