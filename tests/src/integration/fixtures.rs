//! Device trees and bootstrap configurations shared by the flows.

use anyhow::Context;
use lwm2m_bsserver::{BootstrapConfig, DeviceConfig, ServerConfig, ServerSecurity};
use lwm2m_types::ids::*;
use lwm2m_types::{BindingMode, BindingModes, ObjectInstance, ObjectTree, ResourceValue, SecurityMode};

pub const ENDPOINT: &str = "urn:imei:490154203237518";
pub const BS_URI: &str = "coap://bs.example.net:5683";
pub const DM_URI: &str = "coap://dm.example.net:5683";
pub const DM_SHORT_ID: u16 = 101;

/// Device as shipped: a factory bootstrap entry plus a stale management
/// server (short id 5) at non-default instance ids.
pub fn factory_tree() -> ObjectTree {
    let no_sec = ResourceValue::Integer(SecurityMode::NoSec.code());
    ObjectTree::new()
        .with(
            ObjectInstance::new(SECURITY, 0)
                .with(SEC_SERVER_URI, ResourceValue::String("coap://factory-bs:5683".into()))
                .with(SEC_BOOTSTRAP, ResourceValue::Boolean(true))
                .with(SEC_SECURITY_MODE, no_sec.clone()),
        )
        .with(
            ObjectInstance::new(SECURITY, 2)
                .with(SEC_SERVER_URI, ResourceValue::String("coap://old-dm:5683".into()))
                .with(SEC_BOOTSTRAP, ResourceValue::Boolean(false))
                .with(SEC_SECURITY_MODE, no_sec)
                .with(SEC_SERVER_ID, ResourceValue::UnsignedInteger(5)),
        )
        .with(
            ObjectInstance::new(SERVER, 1)
                .with(SRV_SERVER_ID, ResourceValue::UnsignedInteger(5))
                .with(SRV_LIFETIME, ResourceValue::UnsignedInteger(60))
                .with(SRV_BINDING, ResourceValue::String("U".into())),
        )
        .with(
            ObjectInstance::new(DEVICE, 0)
                .with(DEV_MANUFACTURER, ResourceValue::String("Acme".into()))
                .with(DEV_SUPPORTED_BINDING, ResourceValue::String("UQ".into())),
        )
}

/// Bootstrap entry plus one management server.
pub fn bootstrap_config() -> BootstrapConfig {
    let mut config = BootstrapConfig {
        auto_id_for_security_object: true,
        ..Default::default()
    };
    config.security.insert(0, ServerSecurity::no_sec(BS_URI, true));
    config.security.insert(
        1,
        ServerSecurity::no_sec(DM_URI, false).with_server_id(DM_SHORT_ID),
    );
    config
        .servers
        .insert(0, ServerConfig::new(DM_SHORT_ID, BindingModes::new([BindingMode::U])));
    config.device = Some(DeviceConfig::with_binding("U"));
    config
}

/// Configurations exchanged with an admin surface as JSON.
pub fn configs_from_json(json: &str) -> anyhow::Result<Vec<(String, BootstrapConfig)>> {
    let configs: std::collections::BTreeMap<String, BootstrapConfig> =
        serde_json::from_str(json).context("invalid bootstrap configuration document")?;
    Ok(configs.into_iter().collect())
}
