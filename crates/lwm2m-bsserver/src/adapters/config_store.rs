//! # In-Memory Configuration Store
//!
//! ```text
//!   readers ──load()──> Arc<Snapshot> { by_endpoint, by_psk }
//!   writers ──lock()──> build new Snapshot ──store()──> swap
//! ```
//!
//! Reads are lock-free snapshot loads. Writes are serialized by a mutex
//! and publish a fresh snapshot, so a reader sees either the old or the new
//! index pair, never a mix.

use crate::domain::{BootstrapConfig, BootstrapPskIdentity, ConfigurationChecker};
use crate::error::{BootstrapError, BootstrapResult};
use crate::ports::{BootstrapConfigStore, ConfigurationAdmin};
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
struct Snapshot {
    by_endpoint: BTreeMap<String, Arc<BootstrapConfig>>,
    /// Bootstrap PSK identity to the endpoint owning it.
    by_psk: HashMap<BootstrapPskIdentity, String>,
}

/// Configuration store keeping everything in memory.
pub struct InMemoryBootstrapConfigStore {
    snapshot: ArcSwap<Snapshot>,
    write_lock: Mutex<()>,
    checker: ConfigurationChecker,
}

impl Default for InMemoryBootstrapConfigStore {
    fn default() -> Self {
        Self::new(ConfigurationChecker::default())
    }
}

impl InMemoryBootstrapConfigStore {
    pub fn new(checker: ConfigurationChecker) -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(Snapshot::default()),
            write_lock: Mutex::new(()),
            checker,
        }
    }

    /// Endpoint currently bound to a bootstrap PSK identity.
    pub fn endpoint_for_psk(&self, identity: &BootstrapPskIdentity) -> Option<String> {
        self.snapshot.load().by_psk.get(identity).cloned()
    }

    pub fn len(&self) -> usize {
        self.snapshot.load().by_endpoint.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BootstrapConfigStore for InMemoryBootstrapConfigStore {
    fn get(&self, endpoint: &str) -> Option<Arc<BootstrapConfig>> {
        self.snapshot.load().by_endpoint.get(endpoint).cloned()
    }
}

impl ConfigurationAdmin for InMemoryBootstrapConfigStore {
    fn add(&self, endpoint: &str, config: BootstrapConfig) -> BootstrapResult<()> {
        self.checker.verify(&config)?;

        let _guard = self.write_lock.lock();
        let current = self.snapshot.load_full();
        let psk_identity = config.bootstrap_psk_identity();

        if let Some(identity) = &psk_identity {
            if let Some(bound) = current.by_psk.get(identity) {
                if bound != endpoint {
                    debug!(
                        endpoint = %endpoint,
                        bound_endpoint = %bound,
                        psk_identity = %identity.psk_identity,
                        "Bootstrap PSK identity already in use"
                    );
                    return Err(BootstrapError::IdentityConflict {
                        server_uri: identity.server_uri.clone(),
                        psk_identity: identity.psk_identity.clone(),
                        bound_endpoint: bound.clone(),
                    });
                }
            }
        }

        let mut next = Snapshot::clone(&current);
        if let Some(previous) = next.by_endpoint.get(endpoint) {
            if let Some(stale) = previous.bootstrap_psk_identity() {
                next.by_psk.remove(&stale);
            }
        }
        if let Some(identity) = psk_identity {
            next.by_psk.insert(identity, endpoint.to_string());
        }
        let replaced = next
            .by_endpoint
            .insert(endpoint.to_string(), Arc::new(config))
            .is_some();
        self.snapshot.store(Arc::new(next));

        info!(endpoint = %endpoint, replaced, "Bootstrap configuration stored");
        Ok(())
    }

    fn remove(&self, endpoint: &str) -> Option<Arc<BootstrapConfig>> {
        let _guard = self.write_lock.lock();
        let current = self.snapshot.load_full();
        if !current.by_endpoint.contains_key(endpoint) {
            return None;
        }

        let mut next = Snapshot::clone(&current);
        let removed = next.by_endpoint.remove(endpoint)?;
        if let Some(identity) = removed.bootstrap_psk_identity() {
            next.by_psk.remove(&identity);
        }
        self.snapshot.store(Arc::new(next));

        info!(endpoint = %endpoint, "Bootstrap configuration removed");
        Some(removed)
    }

    fn get_all(&self) -> BTreeMap<String, Arc<BootstrapConfig>> {
        self.snapshot.load().by_endpoint.clone()
    }
}
