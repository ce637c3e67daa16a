//! # X.509 Usage Checks
//!
//! Decides whether a certificate may be used for the role it is configured
//! for.
//!
//! | Role | Key Usage (if present) | Extended Key Usage (if present) | CA |
//! |------|------------------------|---------------------------------|----|
//! | Client | digitalSignature | clientAuth | - |
//! | Server | digitalSignature | serverAuth | - |
//! | TrustAnchor | keyCertSign | - | required |
//!
//! Input is limited to 16KB; ASN.1 parsing is left to `x509_parser`.

use crate::errors::{SecurityError, SecurityResult};
use tracing::debug;
use x509_parser::prelude::*;

/// Maximum certificate size (16KB is generous for a single cert)
pub const MAX_CERT_SIZE: usize = 16 * 1024;

/// What a certificate is expected to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateRole {
    /// End-entity certificate authenticating a client.
    Client,
    /// End-entity certificate authenticating a server.
    Server,
    /// Certificate used to verify other certificates' signatures.
    TrustAnchor,
}

/// Parse a DER certificate, enforcing the size limit.
pub fn parse_certificate(der: &[u8]) -> SecurityResult<X509Certificate<'_>> {
    if der.len() > MAX_CERT_SIZE {
        return Err(SecurityError::CertificateTooLarge(der.len()));
    }
    let (_, cert) = X509Certificate::from_der(der)
        .map_err(|e| SecurityError::CertificateParse(format!("{:?}", e)))?;
    Ok(cert)
}

/// Check that a DER certificate can be used for `role`.
pub fn check_usage(der: &[u8], role: CertificateRole) -> SecurityResult<()> {
    let cert = parse_certificate(der)?;
    match role {
        CertificateRole::Client => check_authentication(&cert, true),
        CertificateRole::Server => check_authentication(&cert, false),
        CertificateRole::TrustAnchor => check_signature_verification(&cert),
    }
}

/// Check that raw bytes hold a DER SubjectPublicKeyInfo.
pub fn check_public_key(der: &[u8]) -> SecurityResult<()> {
    SubjectPublicKeyInfo::from_der(der)
        .map(|_| ())
        .map_err(|e| SecurityError::InvalidPublicKey(format!("{:?}", e)))
}

fn check_authentication(cert: &X509Certificate<'_>, client: bool) -> SecurityResult<()> {
    let key_usage = cert
        .key_usage()
        .map_err(|e| SecurityError::CertificateParse(e.to_string()))?;
    if let Some(ku) = key_usage {
        if !ku.value.digital_signature() {
            debug!(subject = %cert.subject(), "certificate not for signing");
            return Err(SecurityError::MissingDigitalSignature);
        }
    }

    let extended = cert
        .extended_key_usage()
        .map_err(|e| SecurityError::CertificateParse(e.to_string()))?;
    if let Some(eku) = extended {
        let (found, required) = if client {
            (eku.value.client_auth, "clientAuth")
        } else {
            (eku.value.server_auth, "serverAuth")
        };
        if !found {
            debug!(subject = %cert.subject(), required, "certificate extended key usage mismatch");
            return Err(SecurityError::ExtendedKeyUsageMismatch { required });
        }
    }
    Ok(())
}

fn check_signature_verification(cert: &X509Certificate<'_>) -> SecurityResult<()> {
    let is_ca = cert
        .basic_constraints()
        .map_err(|e| SecurityError::CertificateParse(e.to_string()))?
        .map_or(false, |bc| bc.value.ca);
    if !is_ca {
        return Err(SecurityError::NotCertificateAuthority);
    }

    let key_usage = cert
        .key_usage()
        .map_err(|e| SecurityError::CertificateParse(e.to_string()))?;
    if let Some(ku) = key_usage {
        if !ku.value.key_cert_sign() {
            return Err(SecurityError::MissingKeyCertSign);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcgen::{
        BasicConstraints, CertificateParams, ExtendedKeyUsagePurpose, IsCa, KeyPair,
        KeyUsagePurpose,
    };

    fn certificate(
        key_usages: Vec<KeyUsagePurpose>,
        extended: Vec<ExtendedKeyUsagePurpose>,
        ca: bool,
    ) -> Vec<u8> {
        let mut params = CertificateParams::new(vec!["device.example".to_string()]).unwrap();
        params.key_usages = key_usages;
        params.extended_key_usages = extended;
        if ca {
            params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        }
        let key = KeyPair::generate().unwrap();
        params.self_signed(&key).unwrap().der().to_vec()
    }

    #[test]
    fn test_cert_too_large() {
        let large_data = vec![0u8; MAX_CERT_SIZE + 1];
        let result = check_usage(&large_data, CertificateRole::Client);
        assert!(matches!(result, Err(SecurityError::CertificateTooLarge(_))));
    }

    #[test]
    fn test_invalid_cert() {
        let result = check_usage(b"not a certificate", CertificateRole::Client);
        assert!(matches!(result, Err(SecurityError::CertificateParse(_))));
    }

    #[test]
    fn test_no_extensions_is_accepted_for_authentication() {
        let der = certificate(vec![], vec![], false);
        assert!(check_usage(&der, CertificateRole::Client).is_ok());
        assert!(check_usage(&der, CertificateRole::Server).is_ok());
    }

    #[test]
    fn test_key_usage_without_signature_rejected() {
        let der = certificate(vec![KeyUsagePurpose::KeyEncipherment], vec![], false);
        assert_eq!(
            check_usage(&der, CertificateRole::Client),
            Err(SecurityError::MissingDigitalSignature)
        );
    }

    #[test]
    fn test_extended_usage_must_match_role() {
        let der = certificate(
            vec![KeyUsagePurpose::DigitalSignature],
            vec![ExtendedKeyUsagePurpose::ServerAuth],
            false,
        );
        assert!(check_usage(&der, CertificateRole::Server).is_ok());
        assert_eq!(
            check_usage(&der, CertificateRole::Client),
            Err(SecurityError::ExtendedKeyUsageMismatch {
                required: "clientAuth"
            })
        );
    }

    #[test]
    fn test_trust_anchor_requires_ca() {
        let leaf = certificate(vec![], vec![], false);
        assert_eq!(
            check_usage(&leaf, CertificateRole::TrustAnchor),
            Err(SecurityError::NotCertificateAuthority)
        );

        let ca = certificate(vec![KeyUsagePurpose::KeyCertSign], vec![], true);
        assert!(check_usage(&ca, CertificateRole::TrustAnchor).is_ok());

        let ca_without_signing = certificate(vec![KeyUsagePurpose::DigitalSignature], vec![], true);
        assert_eq!(
            check_usage(&ca_without_signing, CertificateRole::TrustAnchor),
            Err(SecurityError::MissingKeyCertSign)
        );
    }

    #[test]
    fn test_public_key_check() {
        let key = KeyPair::generate().unwrap();
        assert!(check_public_key(&key.public_key_der()).is_ok());
        assert!(check_public_key(&[1, 2, 3]).is_err());
    }
}
