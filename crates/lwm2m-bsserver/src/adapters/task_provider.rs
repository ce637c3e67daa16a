//! # Task Providers
//!
//! ## DiscoveryTaskProvider
//!
//! ```text
//! batch 1: discover /                              (last = false)
//! batch 2: configured deletes
//!          + deletes of discovered instances the config does not define
//!          + writes of every configured instance   (last = true)
//! ```
//!
//! The device's bootstrap-server Security instance (the `/0/x` link without
//! `ssid`) is never deleted, and with `auto_id_for_security_object` the
//! configured bootstrap entry is written onto it.
//!
//! ## ConfigStoreTaskProvider
//!
//! One batch rendered straight from the stored configuration.

use crate::domain::{to_requests, BootstrapConfig, BootstrapSession, RequestOutcome, Tasks};
use crate::ports::{BootstrapConfigStore, TaskProvider};
use lwm2m_types::ids::{ACCESS_CONTROL, OSCORE, SECURITY, SERVER};
use lwm2m_types::{DownlinkRequest, Link, LwM2mPath};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, trace};

const MANAGED_OBJECTS: [u16; 4] = [SECURITY, SERVER, ACCESS_CONTROL, OSCORE];
const DEFAULT_OBJECT_VERSION: &str = "1.0";

/// Discover first, then apply the configuration as a diff.
pub struct DiscoveryTaskProvider {
    store: Arc<dyn BootstrapConfigStore>,
}

impl DiscoveryTaskProvider {
    pub fn new(store: Arc<dyn BootstrapConfigStore>) -> Self {
        Self { store }
    }

    fn apply(&self, session: &BootstrapSession, config: &BootstrapConfig, links: &[Link]) -> Tasks {
        let bootstrap_instance = links.iter().find_map(|link| match link.path {
            LwM2mPath::ObjectInstance(SECURITY, id) if link.short_server_id.is_none() => Some(id),
            _ => None,
        });
        let bootstrap_server_id = if config.auto_id_for_security_object {
            bootstrap_instance
        } else {
            None
        };

        let mut requests = to_requests(config, session.content_format(), bootstrap_server_id);
        let desired: BTreeSet<LwM2mPath> = requests
            .iter()
            .filter(|r| matches!(r, DownlinkRequest::Write { .. }))
            .filter_map(DownlinkRequest::path)
            .collect();

        let stale: Vec<DownlinkRequest> = links
            .iter()
            .filter_map(|link| match link.path {
                LwM2mPath::ObjectInstance(object_id, instance_id)
                    if MANAGED_OBJECTS.contains(&object_id) =>
                {
                    let is_bootstrap =
                        object_id == SECURITY && Some(instance_id) == bootstrap_instance;
                    (!is_bootstrap).then_some(link.path)
                }
                _ => None,
            })
            .filter(|path| !desired.contains(path))
            .filter(|path| !config.to_delete.iter().any(|deleted| covers(deleted, path)))
            .map(|path| DownlinkRequest::Delete { path })
            .collect();

        debug!(
            endpoint = %session.endpoint(),
            stale = stale.len(),
            writes = desired.len(),
            ?bootstrap_instance,
            "Computed bootstrap diff"
        );

        let insert_at = config.to_delete.len();
        requests.splice(insert_at..insert_at, stale);
        Tasks::new(requests, true).with_supported_objects(supported_objects(links))
    }
}

impl TaskProvider for DiscoveryTaskProvider {
    fn get_tasks(
        &self,
        session: &BootstrapSession,
        previous_responses: Option<&[RequestOutcome]>,
    ) -> Option<Tasks> {
        let config = self.store.get(session.endpoint())?;

        let Some(responses) = previous_responses else {
            return Some(Tasks::new(
                vec![DownlinkRequest::Discover {
                    path: LwM2mPath::Root,
                }],
                false,
            ));
        };

        match responses.first().and_then(RequestOutcome::response) {
            Some(response) if response.is_success() => {
                Some(self.apply(session, &config, &response.links))
            }
            _ => {
                debug!(endpoint = %session.endpoint(), "Discover failed, writing full configuration");
                Some(Tasks::new(
                    to_requests(&config, session.content_format(), None),
                    true,
                ))
            }
        }
    }
}

/// Writes the stored configuration in a single batch.
pub struct ConfigStoreTaskProvider {
    store: Arc<dyn BootstrapConfigStore>,
}

impl ConfigStoreTaskProvider {
    pub fn new(store: Arc<dyn BootstrapConfigStore>) -> Self {
        Self { store }
    }
}

impl TaskProvider for ConfigStoreTaskProvider {
    fn get_tasks(
        &self,
        session: &BootstrapSession,
        previous_responses: Option<&[RequestOutcome]>,
    ) -> Option<Tasks> {
        if previous_responses.is_some() {
            return None;
        }
        let config = self.store.get(session.endpoint())?;
        trace!(endpoint = %session.endpoint(), "Rendering stored configuration");
        Some(Tasks::new(
            to_requests(&config, session.content_format(), None),
            true,
        ))
    }
}

fn covers(deleted: &LwM2mPath, path: &LwM2mPath) -> bool {
    match deleted {
        LwM2mPath::Root => true,
        LwM2mPath::Object(object_id) => path.object_id() == Some(*object_id),
        _ => deleted == path,
    }
}

fn supported_objects(links: &[Link]) -> BTreeMap<u16, String> {
    links
        .iter()
        .filter_map(|link| match link.path {
            LwM2mPath::Object(object_id) => Some((
                object_id,
                link.version
                    .clone()
                    .unwrap_or_else(|| DEFAULT_OBJECT_VERSION.to_string()),
            )),
            _ => None,
        })
        .collect()
}
