//! # Bootstrap Handler
//!
//! Device-side state of a bootstrap session.
//!
//! ```text
//! IDLE ──try_init_session──→ BOOTSTRAPPING ──finished (ack sent)──→ signal fired
//!   ↑                              │
//!   └────────── close_session ─────┘
//! ```
//!
//! The bootstrapping flag and the completion signal share one lock. Delete
//! and Finish are only accepted while bootstrapping and only from the
//! bootstrap authority; anything else gets a Bad Request and leaves the
//! state untouched.

mod signal;

#[cfg(test)]
mod tests;

use crate::domain::ConsistencyChecker;
use crate::error::WaitError;
use crate::ports::ObjectTreeAccessor;
use crate::settings::BootstrapHandlerSettings;
use lwm2m_types::{CallerRole, LwM2mPath, Response, ResponseCode};
use parking_lot::Mutex;
use signal::CompletionSignal;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Default)]
struct HandlerState {
    bootstrapping: bool,
    signal: Option<Arc<CompletionSignal>>,
}

/// Reply to a Bootstrap-Finish.
///
/// `completion` is only set when the finish was accepted; the transport
/// calls [`FinishCompletion::acknowledged`] once the response is on the
/// wire, so the session cannot end before the server saw the answer.
pub struct FinishReply {
    pub response: Response,
    pub completion: Option<FinishCompletion>,
}

/// Fires the completion signal of an accepted Bootstrap-Finish.
pub struct FinishCompletion {
    signal: Arc<CompletionSignal>,
}

impl FinishCompletion {
    pub fn acknowledged(self) {
        self.signal.finish();
    }
}

pub struct BootstrapHandler {
    objects: Arc<dyn ObjectTreeAccessor>,
    checker: ConsistencyChecker,
    settings: BootstrapHandlerSettings,
    state: Mutex<HandlerState>,
}

impl BootstrapHandler {
    pub fn new(objects: Arc<dyn ObjectTreeAccessor>) -> Self {
        Self::with_checker(objects, ConsistencyChecker::default())
    }

    pub fn with_checker(objects: Arc<dyn ObjectTreeAccessor>, checker: ConsistencyChecker) -> Self {
        Self {
            objects,
            checker,
            settings: BootstrapHandlerSettings::default(),
            state: Mutex::new(HandlerState::default()),
        }
    }

    pub fn with_settings(mut self, settings: BootstrapHandlerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Enter BOOTSTRAPPING with a fresh completion signal. `false` if a
    /// session is already running.
    pub fn try_init_session(&self) -> bool {
        let mut state = self.state.lock();
        if state.bootstrapping {
            return false;
        }
        state.bootstrapping = true;
        state.signal = Some(Arc::new(CompletionSignal::new()));
        debug!("Bootstrap session initialized");
        true
    }

    pub fn is_bootstrapping(&self) -> bool {
        self.state.lock().bootstrapping
    }

    /// Bootstrap-Finish from `caller`.
    ///
    /// The device objects must pass the consistency checks, otherwise the
    /// server gets a Not Acceptable listing every violation.
    pub fn finished(&self, caller: &CallerRole) -> FinishReply {
        let signal = match self.guard(caller, "finish") {
            Ok(signal) => signal,
            Err(response) => {
                return FinishReply {
                    response,
                    completion: None,
                }
            }
        };

        if let Some(violations) = self.checker.check(self.objects.as_ref()) {
            warn!(?violations, "Bootstrap finished with an inconsistent configuration");
            return FinishReply {
                response: Response::error(ResponseCode::NotAcceptable, violations.join(", ")),
                completion: None,
            };
        }

        info!("Bootstrap finished by the bootstrap server");
        FinishReply {
            response: Response::changed(),
            completion: Some(FinishCompletion { signal }),
        }
    }

    /// Bootstrap-Delete from `caller`. The Device object and the
    /// bootstrap-server Security instance are kept.
    pub fn delete(&self, caller: &CallerRole, path: &LwM2mPath) -> Response {
        if let Err(response) = self.guard(caller, "delete") {
            return response;
        }
        match self.objects.delete(path) {
            Ok(deleted) => {
                debug!(path = %path, deleted = deleted.len(), "Bootstrap delete applied");
                Response::deleted()
            }
            Err(e) => Response::error(e.response_code(), e.to_string()),
        }
    }

    /// Block until the running session is finished.
    ///
    /// `Ok(true)` when the bootstrap server finished it, `Ok(false)` on
    /// timeout or when no session is running, `Err(Interrupted)` when the
    /// session was closed while waiting. Never closes the session itself.
    pub fn wait_bootstrap_finished(&self, timeout: Duration) -> Result<bool, WaitError> {
        let Some(signal) = self.state.lock().signal.clone() else {
            return Ok(false);
        };
        let finished = signal.wait(timeout)?;
        if !finished {
            debug!(timeout_ms = timeout.as_millis() as u64, "Bootstrap not finished in time");
        }
        Ok(finished)
    }

    /// [`Self::wait_bootstrap_finished`] bounded by the configured timeout.
    pub fn wait_bootstrap_finished_default(&self) -> Result<bool, WaitError> {
        self.wait_bootstrap_finished(self.settings.wait_timeout)
    }

    /// Back to IDLE whatever the current state; pending waiters are
    /// interrupted.
    pub fn close_session(&self) {
        let mut state = self.state.lock();
        state.bootstrapping = false;
        if let Some(signal) = state.signal.take() {
            signal.interrupt();
        }
    }

    fn guard(&self, caller: &CallerRole, operation: &str) -> Result<Arc<CompletionSignal>, Response> {
        let state = self.state.lock();
        let signal = match (&state.signal, state.bootstrapping) {
            (Some(signal), true) => signal.clone(),
            _ => {
                debug!(operation, "Rejected, no pending bootstrap session");
                return Err(Response::bad_request("no pending bootstrap session"));
            }
        };
        if !caller.is_bootstrap_server() {
            debug!(operation, ?caller, "Rejected, caller is not the bootstrap server");
            return Err(Response::bad_request(format!(
                "only a bootstrap server can {operation} during a bootstrap session"
            )));
        }
        Ok(signal)
    }
}
