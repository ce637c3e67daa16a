//! Error types for the bootstrap server

use thiserror::Error;

/// Bootstrap server errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BootstrapError {
    /// Configuration failed validation; every violation is listed
    #[error("Invalid bootstrap configuration: {}", violations.join("; "))]
    ConfigurationInvalid { violations: Vec<String> },

    /// PSK identity already bound to another endpoint for the same server
    #[error("PSK identity '{psk_identity}' for {server_uri} is already used by endpoint {bound_endpoint}")]
    IdentityConflict {
        server_uri: String,
        psk_identity: String,
        bound_endpoint: String,
    },

    /// Credential record would make a transport identity ambiguous
    #[error("PSK identity '{psk_identity}' is already registered for endpoint {bound_endpoint}")]
    NonUniqueSecurityInfo {
        psk_identity: String,
        bound_endpoint: String,
    },

    /// Endpoint name neither sent nor resolvable from the transport identity
    #[error("Unable to determine endpoint name for identity {identity}")]
    MissingEndpoint { identity: String },

    /// Runtime settings rejected
    #[error("Invalid settings: {reason}")]
    InvalidSettings { reason: String },
}

/// Result type for bootstrap server operations
pub type BootstrapResult<T> = Result<T, BootstrapError>;

/// Why a single downlink request produced no response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestFailure {
    /// No response within the request timeout
    #[error("request timed out")]
    Timeout,

    /// Transport reported an error
    #[error("transport error: {0}")]
    Transport(String),

    /// Request was abandoned by the transport before completion
    #[error("request cancelled")]
    Cancelled,
}

/// Error raised by a session listener callback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("listener '{listener}' failed: {reason}")]
pub struct ListenerError {
    pub listener: String,
    pub reason: String,
}

impl ListenerError {
    pub fn new(listener: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            listener: listener.into(),
            reason: reason.into(),
        }
    }
}
