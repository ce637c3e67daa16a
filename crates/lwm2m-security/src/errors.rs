//! Credential check errors.

use crate::certificate::MAX_CERT_SIZE;
use thiserror::Error;

/// Errors raised while checking credentials.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecurityError {
    /// Certificate exceeds the accepted size
    #[error("certificate too large: {0} bytes (max {MAX_CERT_SIZE})")]
    CertificateTooLarge(usize),

    /// Certificate is not valid DER X.509
    #[error("failed to parse X.509 certificate: {0}")]
    CertificateParse(String),

    /// Key usage extension present without digitalSignature
    #[error("certificate key usage does not allow digital signature")]
    MissingDigitalSignature,

    /// Extended key usage present without the purpose required by the role
    #[error("certificate extended key usage does not include {required}")]
    ExtendedKeyUsageMismatch { required: &'static str },

    /// Trust anchor is not a CA certificate
    #[error("certificate is not a CA certificate")]
    NotCertificateAuthority,

    /// Key usage extension present without keyCertSign
    #[error("certificate key usage does not allow certificate signing")]
    MissingKeyCertSign,

    /// Raw public key is not a valid SubjectPublicKeyInfo
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),
}

/// Result type for credential checks.
pub type SecurityResult<T> = Result<T, SecurityError>;
