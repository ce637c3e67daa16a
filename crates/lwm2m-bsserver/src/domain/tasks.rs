//! Batches handed out by a task provider and what came back for them.

use crate::error::RequestFailure;
use lwm2m_types::{DownlinkRequest, Response};
use std::collections::BTreeMap;

/// One batch of downlink requests.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tasks {
    pub requests: Vec<DownlinkRequest>,
    /// Object id to version, as claimed by the device.
    pub supported_objects: BTreeMap<u16, String>,
    /// No further batch follows; the orchestrator finishes after this one.
    pub last: bool,
}

impl Tasks {
    pub fn new(requests: Vec<DownlinkRequest>, last: bool) -> Self {
        Self {
            requests,
            supported_objects: BTreeMap::new(),
            last,
        }
    }

    pub fn with_supported_objects(mut self, supported_objects: BTreeMap<u16, String>) -> Self {
        self.supported_objects = supported_objects;
        self
    }
}

/// Outcome of a single downlink request: a response or no response at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    Response(Response),
    Failed(RequestFailure),
}

impl RequestOutcome {
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Response(response) => Some(response),
            Self::Failed(_) => None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.response().is_some_and(Response::is_success)
    }
}
