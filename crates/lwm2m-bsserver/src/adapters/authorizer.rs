//! Authorization and endpoint resolution adapters.

use crate::domain::check_security_infos;
use crate::ports::{Authorization, EndpointNameProvider, SecurityStore, SessionAuthorizer};
use lwm2m_types::{BootstrapRequest, Identity};
use std::sync::Arc;

/// Authorizes devices against the records of a [`SecurityStore`].
pub struct SecurityStoreAuthorizer {
    store: Arc<dyn SecurityStore>,
}

impl SecurityStoreAuthorizer {
    pub fn new(store: Arc<dyn SecurityStore>) -> Self {
        Self { store }
    }
}

impl SessionAuthorizer for SecurityStoreAuthorizer {
    fn authorize(&self, _request: &BootstrapRequest, endpoint: &str, identity: &Identity) -> Authorization {
        let infos = self.store.get_all_by_endpoint(endpoint);
        if check_security_infos(endpoint, identity, &infos) {
            Authorization::approved()
        } else {
            Authorization::Declined
        }
    }
}

/// Approves every request. Used when no credential store is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAllAuthorizer;

impl SessionAuthorizer for AllowAllAuthorizer {
    fn authorize(&self, _request: &BootstrapRequest, _endpoint: &str, _identity: &Identity) -> Authorization {
        Authorization::approved()
    }
}

/// Endpoint from the request, else the X.509 common name.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEndpointNameProvider;

impl EndpointNameProvider for DefaultEndpointNameProvider {
    fn endpoint_name(&self, request: &BootstrapRequest, identity: &Identity) -> Option<String> {
        if let Some(endpoint) = &request.endpoint_name {
            return Some(endpoint.clone());
        }
        match identity {
            Identity::X509 { common_name } => Some(common_name.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemorySecurityStore;
    use crate::domain::SecurityInfo;

    #[test]
    fn test_store_backed_authorization() {
        let store = Arc::new(InMemorySecurityStore::new());
        store.add(SecurityInfo::psk("ep1", "id1", vec![1])).unwrap();
        let authorizer = SecurityStoreAuthorizer::new(store);
        let request = BootstrapRequest::new("ep1");

        assert!(authorizer.authorize(&request, "ep1", &Identity::psk("id1")).is_approved());
        assert_eq!(
            authorizer.authorize(&request, "ep1", &Identity::Unsecure),
            Authorization::Declined
        );
        assert!(authorizer.authorize(&request, "unknown", &Identity::Unsecure).is_approved());
    }

    #[test]
    fn test_endpoint_name_fallback() {
        let provider = DefaultEndpointNameProvider;
        let anonymous = BootstrapRequest::default();
        assert_eq!(
            provider.endpoint_name(&anonymous, &Identity::x509("urn:dev:7")).as_deref(),
            Some("urn:dev:7")
        );
        assert!(provider.endpoint_name(&anonymous, &Identity::psk("id")).is_none());
        assert_eq!(
            provider
                .endpoint_name(&BootstrapRequest::new("ep"), &Identity::x509("cn"))
                .as_deref(),
            Some("ep")
        );
    }
}
