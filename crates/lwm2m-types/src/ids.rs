//! Object and resource identifiers of the core LWM2M objects.

/// LWM2M Security object.
pub const SECURITY: u16 = 0;
/// LWM2M Server object.
pub const SERVER: u16 = 1;
/// Access Control object.
pub const ACCESS_CONTROL: u16 = 2;
/// Device object.
pub const DEVICE: u16 = 3;
/// OSCORE object.
pub const OSCORE: u16 = 21;

// Security object (0)
pub const SEC_SERVER_URI: u16 = 0;
pub const SEC_BOOTSTRAP: u16 = 1;
pub const SEC_SECURITY_MODE: u16 = 2;
pub const SEC_PUBKEY_IDENTITY: u16 = 3;
pub const SEC_SERVER_PUBKEY: u16 = 4;
pub const SEC_SECRET_KEY: u16 = 5;
pub const SEC_SMS_SECURITY_MODE: u16 = 6;
pub const SEC_SMS_BINDING_KEY_PARAM: u16 = 7;
pub const SEC_SMS_BINDING_KEY_SECRET: u16 = 8;
pub const SEC_SERVER_SMS_NUMBER: u16 = 9;
pub const SEC_SERVER_ID: u16 = 10;
pub const SEC_CLIENT_HOLD_OFF: u16 = 11;
pub const SEC_BS_ACCOUNT_TIMEOUT: u16 = 12;
pub const SEC_MATCHING_TYPE: u16 = 13;
pub const SEC_SNI: u16 = 14;
pub const SEC_CERTIFICATE_USAGE: u16 = 15;
pub const SEC_CIPHER_SUITE: u16 = 16;
pub const SEC_OSCORE_SECURITY_MODE: u16 = 17;

// Server object (1)
pub const SRV_SERVER_ID: u16 = 0;
pub const SRV_LIFETIME: u16 = 1;
pub const SRV_DEFAULT_MIN_PERIOD: u16 = 2;
pub const SRV_DEFAULT_MAX_PERIOD: u16 = 3;
pub const SRV_DISABLE_TIMEOUT: u16 = 5;
pub const SRV_NOTIFY_WHEN_DISABLED: u16 = 6;
pub const SRV_BINDING: u16 = 7;
pub const SRV_APN_LINK: u16 = 10;
pub const SRV_TRIGGER: u16 = 21;
pub const SRV_PREFERRED_TRANSPORT: u16 = 22;
pub const SRV_MUTE_SEND: u16 = 23;

// Access Control object (2)
pub const ACL_OBJECT_ID: u16 = 0;
pub const ACL_OBJECT_INSTANCE_ID: u16 = 1;
pub const ACL_ACL: u16 = 2;
pub const ACL_OWNER: u16 = 3;

// Device object (3)
pub const DEV_MANUFACTURER: u16 = 0;
pub const DEV_MODEL_NUMBER: u16 = 1;
pub const DEV_SERIAL_NUMBER: u16 = 2;
pub const DEV_FIRMWARE_VERSION: u16 = 3;
pub const DEV_SUPPORTED_BINDING: u16 = 16;

// OSCORE object (21)
pub const OSCORE_MASTER_SECRET: u16 = 0;
pub const OSCORE_SENDER_ID: u16 = 1;
pub const OSCORE_RECIPIENT_ID: u16 = 2;
pub const OSCORE_AEAD_ALGORITHM: u16 = 3;
pub const OSCORE_HMAC_ALGORITHM: u16 = 4;
pub const OSCORE_MASTER_SALT: u16 = 5;

/// Human readable name of a core object, used in violation messages.
pub fn object_name(object_id: u16) -> &'static str {
    match object_id {
        SECURITY => "Security",
        SERVER => "Server",
        ACCESS_CONTROL => "Access Control",
        DEVICE => "Device",
        OSCORE => "OSCORE",
        _ => "Unknown",
    }
}
