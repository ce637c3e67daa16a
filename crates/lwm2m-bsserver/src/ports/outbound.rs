//! Driven Ports (SPI - Outbound)
//!
//! What the orchestrator needs from its environment: configuration and
//! credential lookups, endpoint resolution, task computation, the
//! transport, and observers.

use crate::domain::{BootstrapConfig, BootstrapSession, RequestOutcome, SecurityInfo, Tasks};
use crate::error::ListenerError;
use crate::events::SessionEvent;
use async_trait::async_trait;
use lwm2m_types::{BootstrapRequest, DownlinkRequest, Identity};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Read side of the configuration store.
pub trait BootstrapConfigStore: Send + Sync {
    /// Configuration for `endpoint`; `None` is a normal outcome.
    fn get(&self, endpoint: &str) -> Option<Arc<BootstrapConfig>>;
}

/// Credential records the bootstrap server authenticates devices against.
pub trait SecurityStore: Send + Sync {
    fn get_all_by_endpoint(&self, endpoint: &str) -> Vec<SecurityInfo>;
}

/// Best-effort endpoint name for requests that do not carry one.
pub trait EndpointNameProvider: Send + Sync {
    fn endpoint_name(&self, request: &BootstrapRequest, identity: &Identity) -> Option<String>;
}

/// Outcome of authorizing a bootstrap request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    Approved {
        application_data: BTreeMap<String, String>,
    },
    Declined,
}

impl Authorization {
    pub fn approved() -> Self {
        Self::Approved {
            application_data: BTreeMap::new(),
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved { .. })
    }
}

/// Decides whether a device may bootstrap. Must not have side effects.
pub trait SessionAuthorizer: Send + Sync {
    fn authorize(&self, request: &BootstrapRequest, endpoint: &str, identity: &Identity) -> Authorization;
}

/// Computes the request batches of a session.
///
/// `previous_responses` is `None` on the first call, then the outcomes of
/// the previous batch in request order. Never called again after a batch
/// with `last` set. `None` on the first call means nothing to do for this
/// device; later, it finishes the session.
pub trait TaskProvider: Send + Sync {
    fn get_tasks(
        &self,
        session: &BootstrapSession,
        previous_responses: Option<&[RequestOutcome]>,
    ) -> Option<Tasks>;
}

/// Transport towards the device. Exactly one outcome per request.
#[async_trait]
pub trait RequestSender: Send + Sync {
    async fn send(&self, session: &BootstrapSession, request: &DownlinkRequest) -> RequestOutcome;
}

/// Observer of session lifecycle events.
pub trait SessionListener: Send + Sync {
    /// Name used when reporting a failing listener.
    fn name(&self) -> &str {
        "session-listener"
    }

    fn on_event(&self, event: &SessionEvent) -> Result<(), ListenerError>;
}
