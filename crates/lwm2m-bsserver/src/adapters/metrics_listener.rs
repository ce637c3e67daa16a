//! Listener feeding the Prometheus counters in [`crate::metrics`].

use crate::error::ListenerError;
use crate::events::{FailureCause, SessionEvent};
use crate::metrics;
use crate::ports::{SessionListener, SessionOutcome};

/// Counts sessions and requests by outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsListener;

impl SessionListener for MetricsListener {
    fn name(&self) -> &str {
        "metrics"
    }

    fn on_event(&self, event: &SessionEvent) -> Result<(), ListenerError> {
        match event {
            SessionEvent::SessionInitiated { .. } => metrics::record_session_started(),
            SessionEvent::Authorized { .. } => metrics::adjust_active_sessions(1),
            SessionEvent::UnAuthorized { .. } => {
                metrics::record_session_outcome(SessionOutcome::Declined.label())
            }
            SessionEvent::NoConfig { .. } => {
                metrics::adjust_active_sessions(-1);
                metrics::record_session_outcome(SessionOutcome::NoConfig.label());
            }
            SessionEvent::End { .. } => {
                metrics::adjust_active_sessions(-1);
                metrics::record_session_outcome(SessionOutcome::Succeeded.label());
            }
            SessionEvent::Failed { cause, .. } => {
                metrics::adjust_active_sessions(-1);
                let outcome = match cause {
                    FailureCause::Cancelled => SessionOutcome::Cancelled,
                    other => SessionOutcome::Failed(*other),
                };
                metrics::record_session_outcome(outcome.label());
            }
            SessionEvent::ResponseSuccess { .. } => metrics::record_request_outcome("success"),
            SessionEvent::ResponseError { .. } => metrics::record_request_outcome("error"),
            SessionEvent::RequestFailure { .. } => metrics::record_request_outcome("failure"),
            SessionEvent::SendRequest { .. } => {}
        }
        Ok(())
    }
}
