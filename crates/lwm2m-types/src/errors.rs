//! # Error Types
//!
//! Errors raised while parsing or reading shared LWM2M values.

use thiserror::Error;

/// Errors produced by the shared type layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    /// Path string is not of the form `/`, `/O`, `/O/I` or `/O/I/R`.
    #[error("Invalid path '{0}'")]
    InvalidPath(String),

    /// Binding string contains an unknown or repeated mode.
    #[error("Invalid binding '{value}': {reason}")]
    InvalidBinding { value: String, reason: String },

    /// Security mode code outside 0..=4.
    #[error("Unknown security mode code: {0}")]
    UnknownSecurityMode(i64),

    /// Certificate usage code outside 0..=3.
    #[error("Unknown certificate usage code: {0}")]
    UnknownCertificateUsage(i64),

    /// Content format code not handled by this stack.
    #[error("Unknown content format code: {0}")]
    UnknownContentFormat(u16),

    /// A mandatory resource is absent from an instance.
    #[error("Missing resource /{object_id}/{instance_id}/{resource_id}")]
    MissingResource {
        object_id: u16,
        instance_id: u16,
        resource_id: u16,
    },

    /// A resource holds a value of the wrong type.
    #[error("Resource /{object_id}/{instance_id}/{resource_id} has wrong type, expected {expected}")]
    InvalidResourceType {
        object_id: u16,
        instance_id: u16,
        resource_id: u16,
        expected: &'static str,
    },

    /// More than one security instance is flagged as bootstrap server.
    #[error("There is more than one bootstrap configuration in security object")]
    DuplicateBootstrapServer,

    /// A device management security entry has no matching server instance.
    #[error("No server instance with short server id {short_id}")]
    MissingServerInstance { short_id: u64 },

    /// A security instance links to an OSCORE instance that does not exist.
    #[error("Security instance /0/{security_instance} links to missing OSCORE instance {oscore_instance}")]
    MissingOscoreInstance {
        security_instance: u16,
        oscore_instance: u16,
    },

    /// An object link points at the wrong object.
    #[error("Security instance /0/{security_instance}: OSCORE link targets object {object_id}")]
    InvalidObjectLink {
        security_instance: u16,
        object_id: u16,
    },
}

/// Result type for shared type operations.
pub type TypesResult<T> = Result<T, TypesError>;
