//! # Object Tree Snapshots
//!
//! Plain-data view of LWM2M object instances and their resources. Used by
//! the server to describe what it is about to write and by the device to
//! describe what it currently holds.
//!
//! ```text
//! ObjectTree
//!   └── object id ──→ instance id ──→ ObjectInstance
//!                                        └── resource id ──→ ResourceValue
//! ```

use crate::errors::{TypesError, TypesResult};
use crate::path::LwM2mPath;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value held by a single resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceValue {
    String(String),
    Integer(i64),
    UnsignedInteger(u64),
    Boolean(bool),
    Opaque(Vec<u8>),
    /// Link to another object instance (`object_id:instance_id`).
    ObjectLink { object_id: u16, instance_id: u16 },
    /// Multi-instance resource.
    Multiple(BTreeMap<u16, ResourceValue>),
}

impl ResourceValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
            Self::UnsignedInteger(_) => "unsigned integer",
            Self::Boolean(_) => "boolean",
            Self::Opaque(_) => "opaque",
            Self::ObjectLink { .. } => "object link",
            Self::Multiple(_) => "multiple resource",
        }
    }

    /// Integer view of numeric resources.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            Self::UnsignedInteger(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Integer(v) => u64::try_from(*v).ok(),
            Self::UnsignedInteger(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Opaque(v) => Some(v),
            _ => None,
        }
    }
}

/// One instance of an object with its resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInstance {
    pub object_id: u16,
    pub id: u16,
    pub resources: BTreeMap<u16, ResourceValue>,
}

impl ObjectInstance {
    pub fn new(object_id: u16, id: u16) -> Self {
        Self {
            object_id,
            id,
            resources: BTreeMap::new(),
        }
    }

    /// Builder-style resource insertion.
    pub fn with(mut self, resource_id: u16, value: ResourceValue) -> Self {
        self.resources.insert(resource_id, value);
        self
    }

    pub fn set(&mut self, resource_id: u16, value: ResourceValue) {
        self.resources.insert(resource_id, value);
    }

    pub fn get(&self, resource_id: u16) -> Option<&ResourceValue> {
        self.resources.get(&resource_id)
    }

    pub fn path(&self) -> LwM2mPath {
        LwM2mPath::instance(self.object_id, self.id)
    }

    fn require(&self, resource_id: u16) -> TypesResult<&ResourceValue> {
        self.get(resource_id).ok_or(TypesError::MissingResource {
            object_id: self.object_id,
            instance_id: self.id,
            resource_id,
        })
    }

    fn mistyped(&self, resource_id: u16, expected: &'static str) -> TypesError {
        TypesError::InvalidResourceType {
            object_id: self.object_id,
            instance_id: self.id,
            resource_id,
            expected,
        }
    }

    pub fn require_string(&self, resource_id: u16) -> TypesResult<&str> {
        self.require(resource_id)?
            .as_str()
            .ok_or_else(|| self.mistyped(resource_id, "string"))
    }

    pub fn require_i64(&self, resource_id: u16) -> TypesResult<i64> {
        self.require(resource_id)?
            .as_i64()
            .ok_or_else(|| self.mistyped(resource_id, "integer"))
    }

    pub fn require_u64(&self, resource_id: u16) -> TypesResult<u64> {
        self.require(resource_id)?
            .as_u64()
            .ok_or_else(|| self.mistyped(resource_id, "unsigned integer"))
    }

    pub fn require_bool(&self, resource_id: u16) -> TypesResult<bool> {
        self.require(resource_id)?
            .as_bool()
            .ok_or_else(|| self.mistyped(resource_id, "boolean"))
    }

    /// Opaque resources default to empty when absent, as LWM2M clients do.
    pub fn opaque_or_empty(&self, resource_id: u16) -> TypesResult<Vec<u8>> {
        match self.get(resource_id) {
            None => Ok(Vec::new()),
            Some(value) => value
                .as_bytes()
                .map(<[u8]>::to_vec)
                .ok_or_else(|| self.mistyped(resource_id, "opaque")),
        }
    }

    pub fn optional_i64(&self, resource_id: u16) -> TypesResult<Option<i64>> {
        match self.get(resource_id) {
            None => Ok(None),
            Some(value) => value
                .as_i64()
                .map(Some)
                .ok_or_else(|| self.mistyped(resource_id, "integer")),
        }
    }

    pub fn optional_string(&self, resource_id: u16) -> TypesResult<Option<&str>> {
        match self.get(resource_id) {
            None => Ok(None),
            Some(value) => value
                .as_str()
                .map(Some)
                .ok_or_else(|| self.mistyped(resource_id, "string")),
        }
    }
}

/// Snapshot of enabled objects and their instances, keyed by object id.
///
/// An object present with zero instances is still "enabled".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectTree {
    objects: BTreeMap<u16, BTreeMap<u16, ObjectInstance>>,
}

impl ObjectTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an object as enabled without adding instances.
    pub fn enable(&mut self, object_id: u16) {
        self.objects.entry(object_id).or_default();
    }

    /// Insert or replace an instance, enabling its object.
    pub fn insert(&mut self, instance: ObjectInstance) {
        self.objects
            .entry(instance.object_id)
            .or_default()
            .insert(instance.id, instance);
    }

    /// Builder-style insertion.
    pub fn with(mut self, instance: ObjectInstance) -> Self {
        self.insert(instance);
        self
    }

    pub fn has_object(&self, object_id: u16) -> bool {
        self.objects.contains_key(&object_id)
    }

    pub fn object_ids(&self) -> impl Iterator<Item = u16> + '_ {
        self.objects.keys().copied()
    }

    pub fn instances(&self, object_id: u16) -> impl Iterator<Item = &ObjectInstance> {
        self.objects.get(&object_id).into_iter().flat_map(|m| m.values())
    }

    pub fn instance(&self, object_id: u16, instance_id: u16) -> Option<&ObjectInstance> {
        self.objects.get(&object_id)?.get(&instance_id)
    }

    pub fn instance_mut(&mut self, object_id: u16, instance_id: u16) -> Option<&mut ObjectInstance> {
        self.objects.get_mut(&object_id)?.get_mut(&instance_id)
    }

    pub fn instance_count(&self, object_id: u16) -> usize {
        self.objects.get(&object_id).map_or(0, BTreeMap::len)
    }

    pub fn remove_instance(&mut self, object_id: u16, instance_id: u16) -> Option<ObjectInstance> {
        self.objects.get_mut(&object_id)?.remove(&instance_id)
    }

    /// Every instance path currently present, in object then instance order.
    pub fn instance_paths(&self) -> Vec<LwM2mPath> {
        self.objects
            .values()
            .flat_map(|m| m.values().map(ObjectInstance::path))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_object_without_instances() {
        let mut tree = ObjectTree::new();
        tree.enable(2);
        assert!(tree.has_object(2));
        assert_eq!(tree.instance_count(2), 0);
    }

    #[test]
    fn test_require_reports_path() {
        let instance = ObjectInstance::new(1, 4).with(0, ResourceValue::String("x".into()));
        let err = instance.require_i64(0).unwrap_err();
        assert_eq!(err.to_string(), "Resource /1/4/0 has wrong type, expected integer");
        let err = instance.require_i64(1).unwrap_err();
        assert_eq!(err.to_string(), "Missing resource /1/4/1");
    }

    #[test]
    fn test_instance_paths_are_ordered() {
        let tree = ObjectTree::new()
            .with(ObjectInstance::new(1, 2))
            .with(ObjectInstance::new(0, 5))
            .with(ObjectInstance::new(0, 1));
        let paths: Vec<String> = tree.instance_paths().iter().map(|p| p.to_string()).collect();
        assert_eq!(paths, vec!["/0/1", "/0/5", "/1/2"]);
    }
}
