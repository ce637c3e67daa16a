//! # Bootstrap Session
//!
//! A session is created once a device is authorized and lives until the
//! orchestrator reaches a terminal state.
//!
//! ```text
//!   BootstrapSession (Arc, shared)        SessionProgress (owned by driver)
//!   ├── id, endpoint, identity            ├── batches
//!   ├── content_format, application_data  └── batch_responses
//!   ├── created_at, request
//!   ├── supported_objects (ArcSwap)
//!   └── cancelled: AtomicBool  <── any
//! ```
//!
//! Only `cancelled` is ever touched from outside the driving task. The
//! supported-object map is replaced by the driver between batches and read
//! by senders and task providers.

use super::tasks::RequestOutcome;
use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use lwm2m_types::{BootstrapRequest, ContentFormat, Identity};
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

const SESSION_ID_LEN: usize = 10;

/// Session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn random() -> Self {
        let id = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SESSION_ID_LEN)
            .map(char::from)
            .collect();
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable part of a bootstrap session plus its cancellation flag.
#[derive(Debug)]
pub struct BootstrapSession {
    id: SessionId,
    endpoint: String,
    identity: Identity,
    authorized: bool,
    content_format: ContentFormat,
    application_data: BTreeMap<String, String>,
    created_at: DateTime<Utc>,
    request: BootstrapRequest,
    supported_objects: ArcSwap<BTreeMap<u16, String>>,
    cancelled: AtomicBool,
}

impl BootstrapSession {
    pub fn new(
        endpoint: impl Into<String>,
        identity: Identity,
        content_format: ContentFormat,
        application_data: BTreeMap<String, String>,
        request: BootstrapRequest,
    ) -> Self {
        Self {
            id: SessionId::random(),
            endpoint: endpoint.into(),
            identity,
            authorized: true,
            content_format,
            application_data,
            created_at: Utc::now(),
            request,
            supported_objects: ArcSwap::from_pointee(BTreeMap::new()),
            cancelled: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn is_authorized(&self) -> bool {
        self.authorized
    }

    pub fn content_format(&self) -> ContentFormat {
        self.content_format
    }

    pub fn application_data(&self) -> &BTreeMap<String, String> {
        &self.application_data
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn request(&self) -> &BootstrapRequest {
        &self.request
    }

    /// Object id to version, as last reported by the task provider. Empty
    /// until a batch carries a map.
    pub fn supported_objects(&self) -> Arc<BTreeMap<u16, String>> {
        self.supported_objects.load_full()
    }

    pub(crate) fn set_supported_objects(&self, supported_objects: BTreeMap<u16, String>) {
        self.supported_objects.store(Arc::new(supported_objects));
    }

    /// Ask the driver to stop before its next request. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Mutable session state, written only by the task driving the session.
#[derive(Debug, Default)]
pub struct SessionProgress {
    batch_responses: Vec<RequestOutcome>,
    batches: usize,
}

impl SessionProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outcomes of the previous batch, aligned with its requests. `None`
    /// before the first batch.
    pub fn previous_responses(&self) -> Option<&[RequestOutcome]> {
        (self.batches > 0).then_some(self.batch_responses.as_slice())
    }

    pub fn batches(&self) -> usize {
        self.batches
    }

    pub(crate) fn start_batch(&mut self) {
        self.batch_responses.clear();
        self.batches += 1;
    }

    pub(crate) fn record(&mut self, outcome: RequestOutcome) {
        self.batch_responses.push(outcome);
    }
}
