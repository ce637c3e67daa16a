//! Driving Ports (API - Inbound)

use crate::domain::BootstrapConfig;
use crate::error::BootstrapResult;
use crate::events::FailureCause;
use async_trait::async_trait;
use lwm2m_types::{BootstrapRequest, Identity};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Terminal state of a bootstrap attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionOutcome {
    /// Authorization refused; no session was created.
    Declined,
    /// Authorized, but nothing is configured for the endpoint.
    NoConfig,
    Succeeded,
    Failed(FailureCause),
    Cancelled,
}

impl SessionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    /// Label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Declined => "declined",
            Self::NoConfig => "no_config",
            Self::Succeeded => "succeeded",
            Self::Failed(FailureCause::FinishFailed) => "finish_failed",
            Self::Failed(FailureCause::InternalServerError) => "internal_error",
            Self::Failed(FailureCause::Cancelled) | Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SessionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Primary bootstrap API, driven by the transport on Bootstrap-Request.
#[async_trait]
pub trait BootstrapApi: Send + Sync {
    /// Run a full bootstrap session for `request` to a terminal state.
    async fn bootstrap(&self, request: BootstrapRequest, identity: Identity) -> SessionOutcome;

    /// Cancel the ongoing session of `endpoint`. `false` if there is none.
    fn cancel(&self, endpoint: &str) -> bool;
}

/// Administration of bootstrap configurations.
pub trait ConfigurationAdmin: Send + Sync {
    /// Validate and store `config`, replacing any previous one for `endpoint`.
    fn add(&self, endpoint: &str, config: BootstrapConfig) -> BootstrapResult<()>;

    /// Remove and return the configuration of `endpoint`, if any.
    fn remove(&self, endpoint: &str) -> Option<Arc<BootstrapConfig>>;

    fn get_all(&self) -> BTreeMap<String, Arc<BootstrapConfig>>;
}
