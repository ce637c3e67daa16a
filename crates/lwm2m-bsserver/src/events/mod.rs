//! # Session Lifecycle Events
//!
//! Every state transition of a bootstrap session emits exactly one event,
//! in order, to the registered listeners.
//!
//! ```text
//! sessionInitiated ─┬─> unAuthorized                          (DECLINED)
//!                   └─> authorized ─┬─> noConfig              (NO_CONFIG)
//!                                   └─> ( sendRequest
//!                                         ─> responseSuccess
//!                                          | responseError
//!                                          | requestFailure )*
//!                                       ─┬─> end              (SUCCEEDED)
//!                                        └─> failed(cause)    (FAILED / CANCELLED)
//! ```

use crate::domain::BootstrapSession;
use crate::error::RequestFailure;
use lwm2m_types::{BootstrapRequest, DownlinkRequest, Identity, Response};
use std::fmt;
use std::sync::Arc;

/// Why a session did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureCause {
    /// Cancelled by supersession, timeout or an explicit call.
    Cancelled,
    /// Bootstrap-Finish got an error response or no response.
    FinishFailed,
    /// Unexpected error while computing the next batch.
    InternalServerError,
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cancelled => "CANCELLED",
            Self::FinishFailed => "FINISH_FAILED",
            Self::InternalServerError => "INTERNAL_SERVER_ERROR",
        };
        f.write_str(name)
    }
}

/// Lifecycle event of a bootstrap session.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    SessionInitiated {
        request: BootstrapRequest,
        identity: Identity,
    },
    UnAuthorized {
        request: BootstrapRequest,
        identity: Identity,
    },
    Authorized {
        session: Arc<BootstrapSession>,
    },
    NoConfig {
        session: Arc<BootstrapSession>,
    },
    SendRequest {
        session: Arc<BootstrapSession>,
        request: DownlinkRequest,
    },
    ResponseSuccess {
        session: Arc<BootstrapSession>,
        request: DownlinkRequest,
        response: Response,
    },
    ResponseError {
        session: Arc<BootstrapSession>,
        request: DownlinkRequest,
        response: Response,
    },
    RequestFailure {
        session: Arc<BootstrapSession>,
        request: DownlinkRequest,
        failure: RequestFailure,
    },
    End {
        session: Arc<BootstrapSession>,
    },
    Failed {
        session: Arc<BootstrapSession>,
        cause: FailureCause,
    },
}

impl SessionEvent {
    /// Short event name, stable for logs and metrics labels.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SessionInitiated { .. } => "session_initiated",
            Self::UnAuthorized { .. } => "unauthorized",
            Self::Authorized { .. } => "authorized",
            Self::NoConfig { .. } => "no_config",
            Self::SendRequest { .. } => "send_request",
            Self::ResponseSuccess { .. } => "response_success",
            Self::ResponseError { .. } => "response_error",
            Self::RequestFailure { .. } => "request_failure",
            Self::End { .. } => "end",
            Self::Failed { .. } => "failed",
        }
    }

    /// Session the event belongs to; `None` before one exists.
    pub fn session(&self) -> Option<&Arc<BootstrapSession>> {
        match self {
            Self::SessionInitiated { .. } | Self::UnAuthorized { .. } => None,
            Self::Authorized { session }
            | Self::NoConfig { session }
            | Self::SendRequest { session, .. }
            | Self::ResponseSuccess { session, .. }
            | Self::ResponseError { session, .. }
            | Self::RequestFailure { session, .. }
            | Self::End { session }
            | Self::Failed { session, .. } => Some(session),
        }
    }

    /// Endpoint name, when known.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::SessionInitiated { request, .. } | Self::UnAuthorized { request, .. } => {
                request.endpoint_name.as_deref()
            }
            _ => self.session().map(|s| s.endpoint()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::UnAuthorized { .. } | Self::NoConfig { .. } | Self::End { .. } | Self::Failed { .. }
        )
    }
}
