//! # Configuration Checker
//!
//! Validates a [`BootstrapConfig`] before it is stored, by rendering it to
//! the object tree the device would end up with and running the shared
//! consistency pipeline over it, extended with bootstrap-specific rules:
//!
//! - key material matches the security mode (NO_SEC entries carry no keys)
//! - every security entry has a server URI
//! - server short ids are not 0
//! - every Server instance has a device-management security entry

use super::config::BootstrapConfig;
use super::render::to_object_tree;
use crate::error::{BootstrapError, BootstrapResult};
use lwm2m_security::{check_key_material, ConsistencyPipeline, Stage};
use lwm2m_types::ids::*;
use lwm2m_types::{DefaultServersInfoExtractor, ObjectTree, SecurityMode, ServersInfoExtractor};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Staged validation of bootstrap configurations.
pub struct ConfigurationChecker {
    pipeline: ConsistencyPipeline,
}

impl Default for ConfigurationChecker {
    fn default() -> Self {
        Self::new(Arc::new(DefaultServersInfoExtractor))
    }
}

impl ConfigurationChecker {
    pub fn new(extractor: Arc<dyn ServersInfoExtractor>) -> Self {
        let pipeline = ConsistencyPipeline::standard(extractor)
            .with_server_check(check_key_material)
            .with_check(Stage::Semantic, no_sec_without_keys)
            .with_check(Stage::Semantic, server_uris)
            .with_check(Stage::Semantic, short_server_ids)
            .with_check(Stage::Semantic, servers_have_security);
        Self { pipeline }
    }

    /// `Ok(())` or every violation of the first failing stage.
    pub fn verify(&self, config: &BootstrapConfig) -> BootstrapResult<()> {
        let tree = to_object_tree(config);
        match self.pipeline.run(&tree) {
            None => Ok(()),
            Some(violations) => {
                debug!(count = violations.len(), "Bootstrap configuration rejected");
                Err(BootstrapError::ConfigurationInvalid { violations })
            }
        }
    }
}

fn no_sec_without_keys(tree: &ObjectTree) -> Vec<String> {
    let mut violations = Vec::new();
    for instance in tree.instances(SECURITY) {
        let no_sec = instance
            .get(SEC_SECURITY_MODE)
            .and_then(|v| v.as_i64())
            .is_some_and(|code| code == SecurityMode::NoSec.code());
        if !no_sec {
            continue;
        }
        let keys = [
            (SEC_PUBKEY_IDENTITY, "public key or identity"),
            (SEC_SERVER_PUBKEY, "server public key"),
            (SEC_SECRET_KEY, "secret key"),
        ];
        for (resource_id, name) in keys {
            let has_value = instance
                .get(resource_id)
                .and_then(|v| v.as_bytes())
                .is_some_and(|bytes| !bytes.is_empty());
            if has_value {
                violations.push(format!(
                    "Security instance {}: NO_SEC mode must not define a {name}",
                    instance.id
                ));
            }
        }
    }
    violations
}

fn server_uris(tree: &ObjectTree) -> Vec<String> {
    tree.instances(SECURITY)
        .filter(|instance| {
            instance
                .get(SEC_SERVER_URI)
                .and_then(|v| v.as_str())
                .map_or(true, str::is_empty)
        })
        .map(|instance| format!("Security instance {}: server URI is mandatory", instance.id))
        .collect()
}

fn short_server_ids(tree: &ObjectTree) -> Vec<String> {
    tree.instances(SERVER)
        .filter(|instance| instance.get(SRV_SERVER_ID).and_then(|v| v.as_u64()) == Some(0))
        .map(|instance| format!("Server instance {}: short server id must not be 0", instance.id))
        .collect()
}

fn servers_have_security(tree: &ObjectTree) -> Vec<String> {
    let secured: BTreeSet<u64> = tree
        .instances(SECURITY)
        .filter(|instance| instance.get(SEC_BOOTSTRAP).and_then(|v| v.as_bool()) != Some(true))
        .filter_map(|instance| instance.get(SEC_SERVER_ID).and_then(|v| v.as_u64()))
        .collect();

    tree.instances(SERVER)
        .filter_map(|instance| instance.get(SRV_SERVER_ID).and_then(|v| v.as_u64()))
        .filter(|short_id| !secured.contains(short_id))
        .map(|short_id| format!("Server {short_id} has no security entry"))
        .collect()
}
