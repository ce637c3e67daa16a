//! In-memory credential records, indexed by endpoint and PSK identity.

use crate::domain::SecurityInfo;
use crate::error::{BootstrapError, BootstrapResult};
use crate::ports::SecurityStore;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
struct Records {
    by_endpoint: HashMap<String, Vec<SecurityInfo>>,
    by_psk_identity: HashMap<String, String>,
}

/// Credential store keeping everything in memory.
#[derive(Default)]
pub struct InMemorySecurityStore {
    records: RwLock<Records>,
}

impl InMemorySecurityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a record. A PSK identity may belong to a single endpoint.
    pub fn add(&self, info: SecurityInfo) -> BootstrapResult<()> {
        let mut records = self.records.write();
        if let Some(identity) = info.psk_identity() {
            if let Some(bound) = records.by_psk_identity.get(identity) {
                if *bound != info.endpoint {
                    return Err(BootstrapError::NonUniqueSecurityInfo {
                        psk_identity: identity.to_string(),
                        bound_endpoint: bound.clone(),
                    });
                }
            }
            records
                .by_psk_identity
                .insert(identity.to_string(), info.endpoint.clone());
        }

        let entries = records.by_endpoint.entry(info.endpoint.clone()).or_default();
        if !entries.contains(&info) {
            entries.push(info);
        }
        Ok(())
    }

    /// Drop every record of `endpoint`, returning them.
    pub fn remove(&self, endpoint: &str) -> Vec<SecurityInfo> {
        let mut records = self.records.write();
        let removed = records.by_endpoint.remove(endpoint).unwrap_or_default();
        for identity in removed.iter().filter_map(SecurityInfo::psk_identity) {
            records.by_psk_identity.remove(identity);
        }
        removed
    }

    /// Endpoint owning a PSK identity.
    pub fn endpoint_by_psk_identity(&self, identity: &str) -> Option<String> {
        self.records.read().by_psk_identity.get(identity).cloned()
    }
}

impl SecurityStore for InMemorySecurityStore {
    fn get_all_by_endpoint(&self, endpoint: &str) -> Vec<SecurityInfo> {
        self.records
            .read()
            .by_endpoint
            .get(endpoint)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_psk_identity_is_unique() {
        let store = InMemorySecurityStore::new();
        store.add(SecurityInfo::psk("ep1", "id", vec![1])).unwrap();
        let err = store.add(SecurityInfo::psk("ep2", "id", vec![2])).unwrap_err();
        assert!(matches!(err, BootstrapError::NonUniqueSecurityInfo { .. }));
        assert!(store.get_all_by_endpoint("ep2").is_empty());
    }

    #[test]
    fn test_multiple_records_per_endpoint() {
        let store = InMemorySecurityStore::new();
        store.add(SecurityInfo::psk("ep1", "id", vec![1])).unwrap();
        store.add(SecurityInfo::x509("ep1")).unwrap();
        store.add(SecurityInfo::x509("ep1")).unwrap();
        assert_eq!(store.get_all_by_endpoint("ep1").len(), 2);

        assert_eq!(store.remove("ep1").len(), 2);
        assert!(store.endpoint_by_psk_identity("id").is_none());
    }
}
