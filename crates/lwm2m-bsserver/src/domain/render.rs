//! # Configuration Rendering
//!
//! Turns a [`BootstrapConfig`] into the ordered downlink requests that apply
//! it, or into the object tree it describes (for checking).
//!
//! Request order: deletes, Security writes, Server writes, ACL writes,
//! OSCORE writes.

use super::config::{AclConfig, BootstrapConfig, DeviceConfig, OscoreObject, ServerConfig, ServerSecurity};
use lwm2m_types::ids::*;
use lwm2m_types::{ContentFormat, DownlinkRequest, ObjectInstance, ObjectTree, ResourceValue};
use std::collections::BTreeMap;

pub fn security_instance(id: u16, security: &ServerSecurity) -> ObjectInstance {
    let mut instance = ObjectInstance::new(SECURITY, id)
        .with(SEC_SERVER_URI, ResourceValue::String(security.uri.clone()))
        .with(SEC_BOOTSTRAP, ResourceValue::Boolean(security.bootstrap_server))
        .with(SEC_SECURITY_MODE, ResourceValue::Integer(security.security_mode.code()))
        .with(SEC_PUBKEY_IDENTITY, ResourceValue::Opaque(security.public_key_or_id.clone()))
        .with(SEC_SERVER_PUBKEY, ResourceValue::Opaque(security.server_public_key.clone()))
        .with(SEC_SECRET_KEY, ResourceValue::Opaque(security.secret_key.clone()));

    if let Some(server_id) = security.server_id {
        instance.set(SEC_SERVER_ID, ResourceValue::UnsignedInteger(server_id.into()));
    }
    if let Some(hold_off) = security.client_old_off_time {
        instance.set(SEC_CLIENT_HOLD_OFF, ResourceValue::UnsignedInteger(hold_off));
    }
    if let Some(timeout) = security.bootstrap_server_account_timeout {
        instance.set(SEC_BS_ACCOUNT_TIMEOUT, ResourceValue::UnsignedInteger(timeout));
    }
    if let Some(sni) = &security.sni {
        instance.set(SEC_SNI, ResourceValue::String(sni.clone()));
    }
    if let Some(usage) = security.certificate_usage {
        instance.set(SEC_CERTIFICATE_USAGE, ResourceValue::Integer(usage.code()));
    }
    if let Some(oscore_id) = security.oscore_security_mode {
        instance.set(
            SEC_OSCORE_SECURITY_MODE,
            ResourceValue::ObjectLink {
                object_id: OSCORE,
                instance_id: oscore_id,
            },
        );
    }
    instance
}

pub fn server_instance(id: u16, server: &ServerConfig) -> ObjectInstance {
    let mut instance = ObjectInstance::new(SERVER, id)
        .with(SRV_SERVER_ID, ResourceValue::UnsignedInteger(server.short_id.into()))
        .with(SRV_LIFETIME, ResourceValue::UnsignedInteger(server.lifetime))
        .with(SRV_NOTIFY_WHEN_DISABLED, ResourceValue::Boolean(server.notify_if_disabled))
        .with(SRV_BINDING, ResourceValue::String(server.binding.to_string()));

    let optional = [
        (SRV_DEFAULT_MIN_PERIOD, server.default_min_period),
        (SRV_DEFAULT_MAX_PERIOD, server.default_max_period),
        (SRV_DISABLE_TIMEOUT, server.disable_timeout),
    ];
    for (resource_id, value) in optional {
        if let Some(value) = value {
            instance.set(resource_id, ResourceValue::UnsignedInteger(value));
        }
    }
    instance
}

pub fn acl_instance(id: u16, acl: &AclConfig) -> ObjectInstance {
    let rights: BTreeMap<u16, ResourceValue> = acl
        .acls
        .iter()
        .map(|(ssid, bits)| (*ssid, ResourceValue::UnsignedInteger(*bits)))
        .collect();

    let mut instance = ObjectInstance::new(ACCESS_CONTROL, id)
        .with(ACL_OBJECT_ID, ResourceValue::UnsignedInteger(acl.object_id.into()))
        .with(
            ACL_OBJECT_INSTANCE_ID,
            ResourceValue::UnsignedInteger(acl.object_instance_id.into()),
        )
        .with(ACL_ACL, ResourceValue::Multiple(rights));
    if let Some(owner) = acl.access_control_owner {
        instance.set(ACL_OWNER, ResourceValue::UnsignedInteger(owner.into()));
    }
    instance
}

pub fn oscore_instance(id: u16, oscore: &OscoreObject) -> ObjectInstance {
    let mut instance = ObjectInstance::new(OSCORE, id)
        .with(OSCORE_MASTER_SECRET, ResourceValue::Opaque(oscore.master_secret.clone()))
        .with(OSCORE_SENDER_ID, ResourceValue::Opaque(oscore.sender_id.clone()))
        .with(OSCORE_RECIPIENT_ID, ResourceValue::Opaque(oscore.recipient_id.clone()))
        .with(OSCORE_MASTER_SALT, ResourceValue::Opaque(oscore.master_salt.clone()));
    if let Some(aead) = oscore.aead_algorithm {
        instance.set(OSCORE_AEAD_ALGORITHM, ResourceValue::Integer(aead));
    }
    if let Some(hmac) = oscore.hmac_algorithm {
        instance.set(OSCORE_HMAC_ALGORITHM, ResourceValue::Integer(hmac));
    }
    instance
}

fn device_instance(device: &DeviceConfig) -> ObjectInstance {
    let mut instance = ObjectInstance::new(DEVICE, 0);
    let strings = [
        (DEV_SUPPORTED_BINDING, &device.supported_binding),
        (DEV_MANUFACTURER, &device.manufacturer),
        (DEV_MODEL_NUMBER, &device.model_number),
    ];
    for (resource_id, value) in strings {
        if let Some(value) = value {
            instance.set(resource_id, ResourceValue::String(value.clone()));
        }
    }
    instance
}

fn write(instance: ObjectInstance, content_format: ContentFormat) -> DownlinkRequest {
    DownlinkRequest::Write {
        path: instance.path(),
        tree: ObjectTree::new().with(instance),
        content_format,
    }
}

/// Security instance ids as written: the configured ids, or with
/// `bootstrap_server_id` set, the bootstrap entry moved onto that id and the
/// others packed from 0 around it.
pub fn security_ids(config: &BootstrapConfig, bootstrap_server_id: Option<u16>) -> Vec<(u16, &ServerSecurity)> {
    let Some(bs_id) = bootstrap_server_id else {
        return config.security.iter().map(|(id, s)| (*id, s)).collect();
    };

    let mut next = 0u16;
    config
        .security
        .values()
        .map(|security| {
            if security.bootstrap_server {
                (bs_id, security)
            } else {
                if next == bs_id {
                    next += 1;
                }
                let id = next;
                next += 1;
                (id, security)
            }
        })
        .collect()
}

/// Ordered requests applying `config`.
pub fn to_requests(
    config: &BootstrapConfig,
    content_format: ContentFormat,
    bootstrap_server_id: Option<u16>,
) -> Vec<DownlinkRequest> {
    let deletes = config
        .to_delete
        .iter()
        .map(|path| DownlinkRequest::Delete { path: *path });
    let securities = security_ids(config, bootstrap_server_id)
        .into_iter()
        .map(|(id, s)| write(security_instance(id, s), content_format));
    let servers = config
        .servers
        .iter()
        .map(|(id, s)| write(server_instance(*id, s), content_format));
    let acls = config
        .acls
        .iter()
        .map(|(id, a)| write(acl_instance(*id, a), content_format));
    let oscores = config
        .oscore
        .iter()
        .map(|(id, o)| write(oscore_instance(*id, o), content_format));

    deletes
        .chain(securities)
        .chain(servers)
        .chain(acls)
        .chain(oscores)
        .collect()
}

/// Object tree the configuration describes, Device record included.
pub fn to_object_tree(config: &BootstrapConfig) -> ObjectTree {
    let mut tree = ObjectTree::new();
    for (id, security) in &config.security {
        tree.insert(security_instance(*id, security));
    }
    for (id, server) in &config.servers {
        tree.insert(server_instance(*id, server));
    }
    for (id, acl) in &config.acls {
        tree.insert(acl_instance(*id, acl));
    }
    for (id, oscore) in &config.oscore {
        tree.insert(oscore_instance(*id, oscore));
    }
    if let Some(device) = &config.device {
        tree.insert(device_instance(device));
    }
    tree
}
