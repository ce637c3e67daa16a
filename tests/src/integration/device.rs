//! Simulated device answering downlink requests in process.

use async_trait::async_trait;
use lwm2m_bsserver::{BootstrapSession, RequestOutcome, RequestSender};
use lwm2m_client::{BootstrapHandler, ClientError, InMemoryObjectTree, ObjectTreeAccessor};
use lwm2m_types::{CallerRole, DownlinkRequest, ObjectTree, Response, ResponseCode};
use std::sync::Arc;

/// Loopback [`RequestSender`]: requests land on the device's handler and
/// object tree, seen as coming from `role`.
pub struct SimulatedDevice {
    pub handler: Arc<BootstrapHandler>,
    pub objects: Arc<InMemoryObjectTree>,
    role: CallerRole,
}

impl SimulatedDevice {
    pub fn new(tree: ObjectTree) -> Self {
        let objects = Arc::new(InMemoryObjectTree::new(tree));
        Self {
            handler: Arc::new(BootstrapHandler::new(objects.clone())),
            objects,
            role: CallerRole::BootstrapServer,
        }
    }

    /// Requests are attributed to `role` instead of the bootstrap server.
    pub fn seen_as(mut self, role: CallerRole) -> Self {
        self.role = role;
        self
    }

    pub fn handle(&self, request: &DownlinkRequest) -> Response {
        match request {
            DownlinkRequest::Delete { path } => self.handler.delete(&self.role, path),
            DownlinkRequest::Finish => {
                let reply = self.handler.finished(&self.role);
                // returning the response is the transmission
                if let Some(completion) = reply.completion {
                    completion.acknowledged();
                }
                reply.response
            }
            _ if !self.role.is_bootstrap_server() => {
                Response::error(ResponseCode::Unauthorized, "not the bootstrap server")
            }
            DownlinkRequest::Discover { path } => match self.objects.discover(path) {
                Ok(links) => Response::discovered(links),
                Err(e) => error_response(&e),
            },
            DownlinkRequest::Write { path, tree, .. } => match self.objects.write(path, tree) {
                Ok(()) => Response::changed(),
                Err(e) => error_response(&e),
            },
            DownlinkRequest::Read { .. } => {
                Response::error(ResponseCode::MethodNotAllowed, "read is not part of bootstrap")
            }
        }
    }
}

fn error_response(error: &ClientError) -> Response {
    Response::error(error.response_code(), error.to_string())
}

#[async_trait]
impl RequestSender for SimulatedDevice {
    async fn send(&self, _session: &BootstrapSession, request: &DownlinkRequest) -> RequestOutcome {
        RequestOutcome::Response(self.handle(request))
    }
}
