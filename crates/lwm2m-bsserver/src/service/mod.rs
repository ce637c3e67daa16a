//! # Bootstrap Server Service
//!
//! Drives bootstrap sessions from Bootstrap-Request to a terminal state.
//!
//! ```text
//! RECEIVED ─> AUTHORIZING ─┬─> DECLINED
//!                          ├─> NO_CONFIG
//!                          └─> RUNNING ─┬─> SUCCEEDED
//!                                       ├─> FAILED(cause)
//!                                       └─> CANCELLED
//! ```
//!
//! ## RUNNING
//!
//! Batches come from the [`TaskProvider`]; requests of a batch are sent one
//! after the other, each bracketed by a `sendRequest` event and exactly one
//! response or failure event. A failed request is recorded and the session
//! goes on. After the last batch the server sends Bootstrap-Finish.
//!
//! Cancellation is cooperative and checked before every request, so a
//! request already on the wire completes first. A new session for an
//! endpoint cancels the one still running, and every session is cancelled
//! once `session_timeout` elapses.


use crate::adapters::ListenerDispatcher;
use crate::domain::{BootstrapSession, RequestOutcome, SessionProgress, Tasks};
use crate::error::{BootstrapError, RequestFailure};
use crate::events::{FailureCause, SessionEvent};
use crate::ports::{
    Authorization, BootstrapApi, BootstrapConfigStore, EndpointNameProvider, RequestSender,
    SessionAuthorizer, SessionListener, SessionOutcome, TaskProvider,
};
use crate::settings::BootstrapServerSettings;
use async_trait::async_trait;
use lwm2m_types::{BootstrapRequest, DownlinkRequest, Identity};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, trace, warn};

/// LWM2M bootstrap server.
///
/// Built with [`crate::BootstrapServerBuilder`].
pub struct BootstrapServer {
    pub(crate) settings: BootstrapServerSettings,
    pub(crate) config_store: Arc<dyn BootstrapConfigStore>,
    pub(crate) authorizer: Arc<dyn SessionAuthorizer>,
    pub(crate) endpoint_provider: Arc<dyn EndpointNameProvider>,
    pub(crate) task_provider: Arc<dyn TaskProvider>,
    pub(crate) sender: Arc<dyn RequestSender>,
    pub(crate) dispatcher: Arc<ListenerDispatcher>,
    /// Running session per endpoint.
    pub(crate) sessions: Mutex<HashMap<String, Arc<BootstrapSession>>>,
}

impl BootstrapServer {
    pub fn settings(&self) -> &BootstrapServerSettings {
        &self.settings
    }

    pub fn add_listener(&self, listener: Arc<dyn SessionListener>) {
        self.dispatcher.add(listener);
    }

    pub fn remove_listener(&self, listener: &Arc<dyn SessionListener>) -> bool {
        self.dispatcher.remove(listener)
    }

    /// Session currently running for `endpoint`.
    pub fn session(&self, endpoint: &str) -> Option<Arc<BootstrapSession>> {
        self.sessions.lock().get(endpoint).cloned()
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Cancel the running session of `endpoint`; it stops before its next
    /// request. `false` if none is running.
    pub fn cancel(&self, endpoint: &str) -> bool {
        match self.sessions.lock().get(endpoint) {
            Some(session) => {
                debug!(endpoint = %endpoint, session_id = %session.id(), "Cancelling bootstrap session");
                session.cancel();
                true
            }
            None => false,
        }
    }

    /// Run `request` on its own task.
    pub fn spawn_session(
        self: &Arc<Self>,
        request: BootstrapRequest,
        identity: Identity,
    ) -> JoinHandle<SessionOutcome> {
        let server = Arc::clone(self);
        tokio::spawn(async move { server.run_session(request, identity).await })
    }

    /// Handle one Bootstrap-Request up to a terminal state.
    #[instrument(skip_all, fields(endpoint = ?request.endpoint_name))]
    pub async fn run_session(&self, request: BootstrapRequest, identity: Identity) -> SessionOutcome {
        self.emit(SessionEvent::SessionInitiated {
            request: request.clone(),
            identity: identity.clone(),
        });

        let Some(endpoint) = self.endpoint_provider.endpoint_name(&request, &identity) else {
            let error = BootstrapError::MissingEndpoint {
                identity: identity.to_string(),
            };
            debug!(error = %error, "Bootstrap request declined");
            self.emit(SessionEvent::UnAuthorized { request, identity });
            return SessionOutcome::Declined;
        };

        let application_data = match self.authorizer.authorize(&request, &endpoint, &identity) {
            Authorization::Approved { application_data } => application_data,
            Authorization::Declined => {
                debug!(endpoint = %endpoint, identity = %identity, "Bootstrap request unauthorized");
                self.emit(SessionEvent::UnAuthorized { request, identity });
                return SessionOutcome::Declined;
            }
        };

        let config = self.config_store.get(&endpoint);
        let content_format = config
            .as_ref()
            .and_then(|c| c.content_format)
            .or(request.preferred_content_format)
            .unwrap_or(self.settings.default_content_format);

        let session = Arc::new(BootstrapSession::new(
            endpoint,
            identity,
            content_format,
            application_data,
            request,
        ));
        self.emit(SessionEvent::Authorized {
            session: session.clone(),
        });

        if config.is_none() {
            debug!(endpoint = %session.endpoint(), "No bootstrap configuration");
            self.emit(SessionEvent::NoConfig { session });
            return SessionOutcome::NoConfig;
        }

        info!(
            endpoint = %session.endpoint(),
            session_id = %session.id(),
            content_format = ?content_format,
            "Bootstrap session started"
        );
        self.register(&session);
        let watchdog = self.spawn_watchdog(&session);

        let outcome = self.drive(&session).await;

        watchdog.abort();
        self.unregister(&session);
        info!(
            endpoint = %session.endpoint(),
            session_id = %session.id(),
            outcome = %outcome,
            "Bootstrap session ended"
        );
        outcome
    }

    async fn drive(&self, session: &Arc<BootstrapSession>) -> SessionOutcome {
        let mut progress = SessionProgress::new();
        loop {
            let tasks = match self.next_tasks(session, &progress) {
                Err(reason) => {
                    warn!(
                        endpoint = %session.endpoint(),
                        session_id = %session.id(),
                        %reason,
                        "Task provider failed"
                    );
                    return self.fail(session, FailureCause::InternalServerError);
                }
                Ok(None) if progress.batches() == 0 => {
                    debug!(endpoint = %session.endpoint(), "Nothing to do for device");
                    self.emit(SessionEvent::NoConfig {
                        session: session.clone(),
                    });
                    return SessionOutcome::NoConfig;
                }
                Ok(None) => break,
                Ok(Some(tasks)) => tasks,
            };

            let Tasks {
                requests,
                supported_objects,
                last,
            } = tasks;
            trace!(
                session_id = %session.id(),
                batch = progress.batches() + 1,
                requests = requests.len(),
                last,
                "Executing batch"
            );
            progress.start_batch();
            if !supported_objects.is_empty() {
                session.set_supported_objects(supported_objects);
            }

            for request in requests {
                if session.is_cancelled() {
                    return self.fail(session, FailureCause::Cancelled);
                }
                let outcome = self.send(session, request).await;
                progress.record(outcome);
            }
            if last {
                break;
            }
        }
        self.finish(session).await
    }

    fn next_tasks(
        &self,
        session: &BootstrapSession,
        progress: &SessionProgress,
    ) -> Result<Option<Tasks>, String> {
        catch_unwind(AssertUnwindSafe(|| {
            self.task_provider
                .get_tasks(session, progress.previous_responses())
        }))
        .map_err(|panic| {
            panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string())
        })
    }

    async fn finish(&self, session: &Arc<BootstrapSession>) -> SessionOutcome {
        if session.is_cancelled() {
            return self.fail(session, FailureCause::Cancelled);
        }
        match self.send(session, DownlinkRequest::Finish).await {
            outcome if outcome.is_success() => {
                self.emit(SessionEvent::End {
                    session: session.clone(),
                });
                SessionOutcome::Succeeded
            }
            _ => self.fail(session, FailureCause::FinishFailed),
        }
    }

    async fn send(&self, session: &Arc<BootstrapSession>, request: DownlinkRequest) -> RequestOutcome {
        self.emit(SessionEvent::SendRequest {
            session: session.clone(),
            request: request.clone(),
        });
        trace!(session_id = %session.id(), request = %request, "Sending request");

        let outcome = tokio::time::timeout(
            self.settings.request_timeout,
            self.sender.send(session, &request),
        )
        .await
        .unwrap_or(RequestOutcome::Failed(RequestFailure::Timeout));

        let event = match &outcome {
            RequestOutcome::Response(response) if response.is_success() => {
                trace!(session_id = %session.id(), request = %request, code = %response.code, "Request succeeded");
                SessionEvent::ResponseSuccess {
                    session: session.clone(),
                    request,
                    response: response.clone(),
                }
            }
            RequestOutcome::Response(response) => {
                debug!(
                    session_id = %session.id(),
                    request = %request,
                    code = %response.code,
                    message = ?response.error_message,
                    "Request rejected by device"
                );
                SessionEvent::ResponseError {
                    session: session.clone(),
                    request,
                    response: response.clone(),
                }
            }
            RequestOutcome::Failed(failure) => {
                debug!(session_id = %session.id(), request = %request, error = %failure, "Request failed");
                SessionEvent::RequestFailure {
                    session: session.clone(),
                    request,
                    failure: failure.clone(),
                }
            }
        };
        self.emit(event);
        outcome
    }

    fn fail(&self, session: &Arc<BootstrapSession>, cause: FailureCause) -> SessionOutcome {
        debug!(endpoint = %session.endpoint(), session_id = %session.id(), cause = %cause, "Bootstrap session failed");
        self.emit(SessionEvent::Failed {
            session: session.clone(),
            cause,
        });
        match cause {
            FailureCause::Cancelled => SessionOutcome::Cancelled,
            other => SessionOutcome::Failed(other),
        }
    }

    fn register(&self, session: &Arc<BootstrapSession>) {
        let previous = self
            .sessions
            .lock()
            .insert(session.endpoint().to_string(), session.clone());
        if let Some(previous) = previous {
            info!(
                endpoint = %session.endpoint(),
                superseded = %previous.id(),
                session_id = %session.id(),
                "Superseding running bootstrap session"
            );
            previous.cancel();
        }
    }

    fn unregister(&self, session: &Arc<BootstrapSession>) {
        let mut sessions = self.sessions.lock();
        let own = sessions
            .get(session.endpoint())
            .is_some_and(|current| Arc::ptr_eq(current, session));
        if own {
            sessions.remove(session.endpoint());
        }
    }

    fn spawn_watchdog(&self, session: &Arc<BootstrapSession>) -> JoinHandle<()> {
        let session = session.clone();
        let timeout = self.settings.session_timeout;
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            if !session.is_cancelled() {
                warn!(
                    endpoint = %session.endpoint(),
                    session_id = %session.id(),
                    timeout_secs = timeout.as_secs(),
                    "Bootstrap session timed out"
                );
                session.cancel();
            }
        })
    }

    fn emit(&self, event: SessionEvent) {
        self.dispatcher.dispatch(&event);
    }
}

#[async_trait]
impl BootstrapApi for BootstrapServer {
    async fn bootstrap(&self, request: BootstrapRequest, identity: Identity) -> SessionOutcome {
        self.run_session(request, identity).await
    }

    fn cancel(&self, endpoint: &str) -> bool {
        BootstrapServer::cancel(self, endpoint)
    }
}
