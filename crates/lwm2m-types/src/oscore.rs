//! OSCORE security context parameters as carried by object 21.

use serde::{Deserialize, Serialize};

/// Default AEAD algorithm (AES-CCM-16-64-128).
pub const DEFAULT_AEAD_ALGORITHM: i64 = 10;
/// Default HKDF algorithm (HKDF SHA-256).
pub const DEFAULT_HKDF_ALGORITHM: i64 = -10;

/// Raw OSCORE setting. Algorithms stay as COSE codes so that unknown values
/// survive extraction and can be reported by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OscoreSetting {
    pub master_secret: Vec<u8>,
    pub sender_id: Vec<u8>,
    pub recipient_id: Vec<u8>,
    pub aead_algorithm: i64,
    pub hkdf_algorithm: i64,
    pub master_salt: Vec<u8>,
}

impl OscoreSetting {
    pub fn new(master_secret: Vec<u8>, sender_id: Vec<u8>, recipient_id: Vec<u8>) -> Self {
        Self {
            master_secret,
            sender_id,
            recipient_id,
            aead_algorithm: DEFAULT_AEAD_ALGORITHM,
            hkdf_algorithm: DEFAULT_HKDF_ALGORITHM,
            master_salt: Vec::new(),
        }
    }
}
