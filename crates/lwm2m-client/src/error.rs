//! Error types for the device side

use lwm2m_types::{LwM2mPath, ResponseCode};
use thiserror::Error;

/// Errors of object tree operations requested by a server.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Object {0} is not supported")]
    ObjectNotSupported(u16),

    #[error("{path} is not deletable")]
    NotDeletable { path: LwM2mPath },

    #[error("Bootstrap-{operation} on {path} is not supported")]
    UnsupportedOperation { operation: &'static str, path: LwM2mPath },

    #[error("Instance {instance} written under {path}")]
    MisplacedInstance { path: LwM2mPath, instance: LwM2mPath },
}

impl ClientError {
    /// Response code reported back to the server.
    pub fn response_code(&self) -> ResponseCode {
        match self {
            Self::ObjectNotSupported(_) => ResponseCode::NotFound,
            Self::NotDeletable { .. }
            | Self::UnsupportedOperation { .. }
            | Self::MisplacedInstance { .. } => ResponseCode::BadRequest,
        }
    }
}

/// Result type for object tree operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Outcome of waiting for a bootstrap session that did not end normally.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum WaitError {
    /// The session was closed while a caller was still waiting.
    #[error("Bootstrap session closed while waiting for its end")]
    Interrupted,
}
