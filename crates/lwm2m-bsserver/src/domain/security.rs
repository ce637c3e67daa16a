//! # Credential Records
//!
//! What a device is expected to authenticate with when talking to the
//! bootstrap server, and the matching rules against a transport identity.
//!
//! ## Rules
//!
//! | Records | Identity  | Result                         |
//! |---------|-----------|--------------------------------|
//! | none    | unsecure  | allowed                        |
//! | none    | secure    | rejected                       |
//! | some    | unsecure  | rejected                       |
//! | some    | secure    | allowed if any record matches  |

use lwm2m_types::Identity;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Credential kind of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecurityKind {
    Psk { identity: String, key: Vec<u8> },
    Rpk { public_key: Vec<u8> },
    /// Certificate whose subject common name must equal the endpoint name.
    X509,
    Oscore { recipient_id: Vec<u8> },
}

/// Credential record for one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityInfo {
    pub endpoint: String,
    pub kind: SecurityKind,
}

impl SecurityInfo {
    pub fn psk(endpoint: impl Into<String>, identity: impl Into<String>, key: Vec<u8>) -> Self {
        Self {
            endpoint: endpoint.into(),
            kind: SecurityKind::Psk {
                identity: identity.into(),
                key,
            },
        }
    }

    pub fn rpk(endpoint: impl Into<String>, public_key: Vec<u8>) -> Self {
        Self {
            endpoint: endpoint.into(),
            kind: SecurityKind::Rpk { public_key },
        }
    }

    pub fn x509(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            kind: SecurityKind::X509,
        }
    }

    pub fn oscore(endpoint: impl Into<String>, recipient_id: Vec<u8>) -> Self {
        Self {
            endpoint: endpoint.into(),
            kind: SecurityKind::Oscore { recipient_id },
        }
    }

    pub fn psk_identity(&self) -> Option<&str> {
        match &self.kind {
            SecurityKind::Psk { identity, .. } => Some(identity),
            _ => None,
        }
    }

    /// Whether `identity` authenticates as this record.
    pub fn matches(&self, identity: &Identity) -> bool {
        match (&self.kind, identity) {
            (SecurityKind::Psk { identity: expected, .. }, Identity::Psk { identity }) => {
                expected == identity
            }
            (SecurityKind::Rpk { public_key: expected }, Identity::Rpk { public_key }) => {
                expected == public_key
            }
            (SecurityKind::X509, Identity::X509 { common_name }) => *common_name == self.endpoint,
            (
                SecurityKind::Oscore { recipient_id: expected },
                Identity::Oscore { recipient_id },
            ) => expected == recipient_id,
            _ => false,
        }
    }
}

/// Check `identity` against the records registered for `endpoint`.
pub fn check_security_infos(endpoint: &str, identity: &Identity, infos: &[SecurityInfo]) -> bool {
    if infos.is_empty() {
        if identity.is_secure() {
            debug!(endpoint = %endpoint, identity = %identity, "Secure connection without credential record");
            return false;
        }
        return true;
    }

    if !identity.is_secure() {
        debug!(endpoint = %endpoint, "Unsecure connection for endpoint with credential records");
        return false;
    }

    let matched = infos.iter().any(|info| info.matches(identity));
    if !matched {
        debug!(endpoint = %endpoint, identity = %identity, "No credential record matches identity");
    }
    matched
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_records_only_allows_unsecure() {
        assert!(check_security_infos("ep", &Identity::Unsecure, &[]));
        assert!(!check_security_infos("ep", &Identity::psk("id"), &[]));
    }

    #[test]
    fn test_records_reject_unsecure() {
        let infos = [SecurityInfo::psk("ep", "id", vec![1])];
        assert!(!check_security_infos("ep", &Identity::Unsecure, &infos));
    }

    #[test]
    fn test_any_record_may_match() {
        let infos = [
            SecurityInfo::rpk("ep", vec![9, 9]),
            SecurityInfo::psk("ep", "id", vec![1]),
        ];
        assert!(check_security_infos("ep", &Identity::psk("id"), &infos));
        assert!(!check_security_infos("ep", &Identity::psk("other"), &infos));
        assert!(check_security_infos(
            "ep",
            &Identity::Rpk { public_key: vec![9, 9] },
            &infos
        ));
    }

    #[test]
    fn test_x509_common_name_must_be_endpoint() {
        let infos = [SecurityInfo::x509("urn:dev:1")];
        assert!(check_security_infos("urn:dev:1", &Identity::x509("urn:dev:1"), &infos));
        assert!(!check_security_infos("urn:dev:1", &Identity::x509("urn:dev:2"), &infos));
    }

    #[test]
    fn test_oscore_recipient() {
        let infos = [SecurityInfo::oscore("ep", vec![0x01])];
        assert!(check_security_infos(
            "ep",
            &Identity::Oscore { recipient_id: vec![0x01] },
            &infos
        ));
        assert!(!check_security_infos("ep", &Identity::psk("x"), &infos));
    }
}
