//! Outbound ports: what the bootstrap handler needs from the device.

use crate::error::ClientResult;
use lwm2m_types::{Link, LwM2mPath, ObjectTree, ResourceValue};

/// Access to the enabled objects of the device.
///
/// Operations follow Bootstrap-Interface semantics: the Device object and
/// the bootstrap-server Security instance survive a delete.
pub trait ObjectTreeAccessor: Send + Sync {
    /// Copy of every enabled object with its instances.
    fn snapshot(&self) -> ObjectTree;

    /// Value of a single resource, `None` when absent.
    fn read(&self, path: &LwM2mPath) -> Option<ResourceValue>;

    /// Bootstrap-Delete. Returns the instance paths actually removed.
    fn delete(&self, path: &LwM2mPath) -> ClientResult<Vec<LwM2mPath>>;

    /// Bootstrap-Write of the instances held by `tree` under `path`.
    fn write(&self, path: &LwM2mPath, tree: &ObjectTree) -> ClientResult<()>;

    /// Bootstrap-Discover.
    fn discover(&self, path: &LwM2mPath) -> ClientResult<Vec<Link>>;
}
