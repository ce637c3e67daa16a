//! # OSCORE Setting Validation
//!
//! Well-formedness rules for an OSCORE security context (RFC 8613):
//! non-empty master secret, supported AEAD and HKDF algorithms, and sender
//! and recipient ids short enough for the AEAD nonce.

use lwm2m_types::OscoreSetting;

/// AEAD algorithms usable for OSCORE, keyed by COSE code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AeadAlgorithm {
    pub code: i64,
    pub name: &'static str,
    pub nonce_len: usize,
}

const AEAD_ALGORITHMS: &[AeadAlgorithm] = &[
    AeadAlgorithm { code: 10, name: "AES-CCM-16-64-128", nonce_len: 13 },
    AeadAlgorithm { code: 11, name: "AES-CCM-16-64-256", nonce_len: 13 },
    AeadAlgorithm { code: 12, name: "AES-CCM-64-64-128", nonce_len: 7 },
    AeadAlgorithm { code: 13, name: "AES-CCM-64-64-256", nonce_len: 7 },
    AeadAlgorithm { code: 30, name: "AES-CCM-16-128-128", nonce_len: 13 },
    AeadAlgorithm { code: 31, name: "AES-CCM-16-128-256", nonce_len: 13 },
    AeadAlgorithm { code: 32, name: "AES-CCM-64-128-128", nonce_len: 7 },
    AeadAlgorithm { code: 33, name: "AES-CCM-64-128-256", nonce_len: 7 },
    AeadAlgorithm { code: 1, name: "A128GCM", nonce_len: 12 },
    AeadAlgorithm { code: 2, name: "A192GCM", nonce_len: 12 },
    AeadAlgorithm { code: 3, name: "A256GCM", nonce_len: 12 },
    AeadAlgorithm { code: 24, name: "ChaCha20/Poly1305", nonce_len: 12 },
];

const HKDF_ALGORITHMS: &[(i64, &str)] = &[(-10, "HKDF-SHA-256"), (-11, "HKDF-SHA-512")];

pub fn aead_algorithm(code: i64) -> Option<&'static AeadAlgorithm> {
    AEAD_ALGORITHMS.iter().find(|a| a.code == code)
}

pub fn hkdf_algorithm_name(code: i64) -> Option<&'static str> {
    HKDF_ALGORITHMS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Returns every rule the setting violates.
pub fn validate_oscore_setting(setting: &OscoreSetting) -> Vec<String> {
    let mut violations = Vec::new();

    if setting.master_secret.is_empty() {
        violations.push("OSCORE master secret must not be empty".to_string());
    }
    if hkdf_algorithm_name(setting.hkdf_algorithm).is_none() {
        violations.push(format!(
            "OSCORE HKDF algorithm {} is not supported",
            setting.hkdf_algorithm
        ));
    }
    if setting.sender_id.is_empty() && setting.recipient_id.is_empty() {
        violations.push("OSCORE sender id or recipient id must be set".to_string());
    } else if setting.sender_id == setting.recipient_id {
        violations.push("OSCORE sender id and recipient id must differ".to_string());
    }

    match aead_algorithm(setting.aead_algorithm) {
        None => violations.push(format!(
            "OSCORE AEAD algorithm {} is not supported",
            setting.aead_algorithm
        )),
        Some(aead) => {
            // nonce = id length byte + padded id + partial IV (5 bytes)
            let max_id_len = aead.nonce_len - 6;
            for (label, id) in [("sender", &setting.sender_id), ("recipient", &setting.recipient_id)] {
                if id.len() > max_id_len {
                    violations.push(format!(
                        "OSCORE {label} id is {} bytes, {} allows at most {max_id_len}",
                        id.len(),
                        aead.name
                    ));
                }
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_setting() {
        let setting = OscoreSetting::new(vec![1; 16], vec![0x01], vec![0x02]);
        assert!(validate_oscore_setting(&setting).is_empty());
    }

    #[test]
    fn test_collects_every_violation() {
        let mut setting = OscoreSetting::new(vec![], vec![0x01], vec![0x01]);
        setting.hkdf_algorithm = 5;
        let violations = validate_oscore_setting(&setting);
        assert_eq!(violations.len(), 3, "{violations:?}");
    }

    #[test]
    fn test_id_length_bounded_by_nonce() {
        // CCM-64 nonce is 7 bytes: ids may hold a single byte
        let mut setting = OscoreSetting::new(vec![1; 16], vec![1, 2], vec![3]);
        setting.aead_algorithm = 12;
        let violations = validate_oscore_setting(&setting);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("sender id"));
    }

    #[test]
    fn test_unknown_aead() {
        let mut setting = OscoreSetting::new(vec![1; 16], vec![1], vec![2]);
        setting.aead_algorithm = 99;
        assert_eq!(validate_oscore_setting(&setting).len(), 1);
    }
}
