//! # In-Memory Object Tree
//!
//! Device objects held in memory with Bootstrap-Interface semantics:
//!
//! | Operation | Root `/`             | Object `/X`            | Instance `/X/Y`      |
//! |-----------|----------------------|------------------------|----------------------|
//! | delete    | every deletable inst | every deletable inst   | that instance        |
//! | write     | rejected             | each instance in tree  | that instance        |
//! | discover  | objects + instances  | object + its instances | rejected             |
//!
//! The Device object and the bootstrap-server Security instance are never
//! deleted. Writes replace an instance as a whole.

use crate::error::{ClientError, ClientResult};
use crate::ports::ObjectTreeAccessor;
use lwm2m_types::ids::{DEVICE, SECURITY, SEC_BOOTSTRAP, SERVER, SEC_SERVER_ID, SRV_SERVER_ID};
use lwm2m_types::{Link, LwM2mPath, ObjectInstance, ObjectTree, ResourceValue};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::{debug, trace};

pub struct InMemoryObjectTree {
    tree: RwLock<ObjectTree>,
    /// Objects not implemented at version 1.0.
    versions: BTreeMap<u16, String>,
}

impl InMemoryObjectTree {
    /// Device exposing exactly the objects enabled in `tree`.
    pub fn new(tree: ObjectTree) -> Self {
        Self {
            tree: RwLock::new(tree),
            versions: BTreeMap::new(),
        }
    }

    pub fn with_object_version(mut self, object_id: u16, version: impl Into<String>) -> Self {
        self.versions.insert(object_id, version.into());
        self
    }

    fn ensure_supported(tree: &ObjectTree, object_id: u16) -> ClientResult<()> {
        if tree.has_object(object_id) {
            Ok(())
        } else {
            Err(ClientError::ObjectNotSupported(object_id))
        }
    }

    fn object_link(&self, object_id: u16) -> Link {
        let link = Link::new(LwM2mPath::object(object_id));
        match self.versions.get(&object_id) {
            Some(version) => link.with_version(version.clone()),
            None => link,
        }
    }
}

fn is_bootstrap_security(instance: &ObjectInstance) -> bool {
    instance.object_id == SECURITY
        && instance
            .get(SEC_BOOTSTRAP)
            .and_then(ResourceValue::as_bool)
            .unwrap_or(false)
}

fn deletable(instance: &ObjectInstance) -> bool {
    instance.object_id != DEVICE && !is_bootstrap_security(instance)
}

fn instance_link(instance: &ObjectInstance) -> Link {
    let link = Link::new(instance.path());
    let ssid = match instance.object_id {
        SECURITY if !is_bootstrap_security(instance) => instance.get(SEC_SERVER_ID),
        SERVER => instance.get(SRV_SERVER_ID),
        _ => None,
    };
    match ssid.and_then(ResourceValue::as_u64).and_then(|id| u16::try_from(id).ok()) {
        Some(ssid) => link.with_ssid(ssid),
        None => link,
    }
}

impl ObjectTreeAccessor for InMemoryObjectTree {
    fn snapshot(&self) -> ObjectTree {
        self.tree.read().clone()
    }

    fn read(&self, path: &LwM2mPath) -> Option<ResourceValue> {
        let LwM2mPath::Resource(object_id, instance_id, resource_id) = *path else {
            return None;
        };
        self.tree
            .read()
            .instance(object_id, instance_id)?
            .get(resource_id)
            .cloned()
    }

    fn delete(&self, path: &LwM2mPath) -> ClientResult<Vec<LwM2mPath>> {
        let mut tree = self.tree.write();
        let targets: Vec<LwM2mPath> = match *path {
            LwM2mPath::Root => tree
                .object_ids()
                .flat_map(|object_id| tree.instances(object_id))
                .filter(|instance| deletable(instance))
                .map(ObjectInstance::path)
                .collect(),
            LwM2mPath::Object(DEVICE) => return Err(ClientError::NotDeletable { path: *path }),
            LwM2mPath::Object(object_id) => {
                Self::ensure_supported(&tree, object_id)?;
                tree.instances(object_id)
                    .filter(|instance| deletable(instance))
                    .map(ObjectInstance::path)
                    .collect()
            }
            LwM2mPath::ObjectInstance(object_id, instance_id) => {
                Self::ensure_supported(&tree, object_id)?;
                match tree.instance(object_id, instance_id) {
                    Some(instance) if !deletable(instance) => {
                        return Err(ClientError::NotDeletable { path: *path })
                    }
                    Some(instance) => vec![instance.path()],
                    None => Vec::new(),
                }
            }
            LwM2mPath::Resource(..) => return Err(ClientError::NotDeletable { path: *path }),
        };

        for target in &targets {
            if let LwM2mPath::ObjectInstance(object_id, instance_id) = *target {
                tree.remove_instance(object_id, instance_id);
            }
        }
        debug!(path = %path, deleted = targets.len(), "Bootstrap delete");
        Ok(targets)
    }

    fn write(&self, path: &LwM2mPath, written: &ObjectTree) -> ClientResult<()> {
        let (object_id, only_instance) = match *path {
            LwM2mPath::Object(object_id) => (object_id, None),
            LwM2mPath::ObjectInstance(object_id, instance_id) => (object_id, Some(instance_id)),
            LwM2mPath::Root | LwM2mPath::Resource(..) => {
                return Err(ClientError::UnsupportedOperation {
                    operation: "Write",
                    path: *path,
                })
            }
        };

        let mut tree = self.tree.write();
        Self::ensure_supported(&tree, object_id)?;

        let instances: Vec<&ObjectInstance> = written.instances(object_id).collect();
        for instance in &instances {
            if only_instance.is_some_and(|id| id != instance.id) {
                return Err(ClientError::MisplacedInstance {
                    path: *path,
                    instance: instance.path(),
                });
            }
        }
        for instance in instances {
            trace!(path = %instance.path(), resources = instance.resources.len(), "Bootstrap write");
            tree.insert(instance.clone());
        }
        Ok(())
    }

    fn discover(&self, path: &LwM2mPath) -> ClientResult<Vec<Link>> {
        let tree = self.tree.read();
        let objects: Vec<u16> = match *path {
            LwM2mPath::Root => tree.object_ids().collect(),
            LwM2mPath::Object(object_id) => {
                Self::ensure_supported(&tree, object_id)?;
                vec![object_id]
            }
            _ => {
                return Err(ClientError::UnsupportedOperation {
                    operation: "Discover",
                    path: *path,
                })
            }
        };

        let mut links = Vec::new();
        for object_id in objects {
            links.push(self.object_link(object_id));
            links.extend(tree.instances(object_id).map(instance_link));
        }
        Ok(links)
    }
}
