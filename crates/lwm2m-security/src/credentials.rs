//! Per-server credential checks over extracted [`ServerInfo`] records.

use crate::certificate::{check_public_key, check_usage, parse_certificate, CertificateRole};
use crate::oscore::validate_oscore_setting;
use lwm2m_types::{CertificateUsage, ServerCredentials, ServerInfo};

fn label(info: &ServerInfo) -> String {
    if info.bootstrap {
        format!("Bootstrap server {}", info.server_uri)
    } else {
        format!("Server {} ({})", info.server_id, info.server_uri)
    }
}

/// Certificate usage and OSCORE well-formedness of one server record.
pub fn check_server_info(info: &ServerInfo) -> Vec<String> {
    let name = label(info);
    if let Some(oscore) = &info.oscore {
        return validate_oscore_setting(oscore)
            .into_iter()
            .map(|v| format!("{name}: {v}"))
            .collect();
    }

    let mut violations = Vec::new();
    if let ServerCredentials::X509 {
        client_certificate,
        server_certificate,
        certificate_usage,
        ..
    } = &info.credentials
    {
        if let Err(e) = check_usage(client_certificate, CertificateRole::Client) {
            violations.push(format!("{name}: client certificate: {e}"));
        }
        if !server_certificate.is_empty() {
            let role = match certificate_usage {
                CertificateUsage::CaConstraint | CertificateUsage::TrustAnchorAssertion => {
                    CertificateRole::TrustAnchor
                }
                CertificateUsage::ServiceCertificateConstraint
                | CertificateUsage::DomainIssuerCertificate => CertificateRole::Server,
            };
            if let Err(e) = check_usage(server_certificate, role) {
                violations.push(format!("{name}: server certificate: {e}"));
            }
        }
    }
    violations
}

/// Key material expected for the record's security mode.
pub fn check_key_material(info: &ServerInfo) -> Vec<String> {
    let name = label(info);
    let mut violations = Vec::new();
    let mut require = |ok: bool, message: &str| {
        if !ok {
            violations.push(format!("{name}: {message}"));
        }
    };

    match &info.credentials {
        ServerCredentials::NoSec => {}
        ServerCredentials::Psk { identity, key } => {
            require(!identity.is_empty(), "PSK identity must not be empty");
            require(!key.is_empty(), "PSK key must not be empty");
        }
        ServerCredentials::Rpk {
            public_key,
            private_key,
            server_public_key,
        } => {
            require(
                check_public_key(public_key).is_ok(),
                "client public key must be a valid SubjectPublicKeyInfo",
            );
            require(!private_key.is_empty(), "client private key must not be empty");
            require(
                check_public_key(server_public_key).is_ok(),
                "server public key must be a valid SubjectPublicKeyInfo",
            );
        }
        ServerCredentials::X509 {
            client_certificate,
            private_key,
            server_certificate,
            ..
        } => {
            require(
                parse_certificate(client_certificate).is_ok(),
                "client certificate must be a valid X.509 certificate",
            );
            require(!private_key.is_empty(), "client private key must not be empty");
            require(
                parse_certificate(server_certificate).is_ok(),
                "server certificate must be a valid X.509 certificate",
            );
        }
        ServerCredentials::Other => {}
    }
    violations
}
