//! # LWM2M Paths
//!
//! A path addresses the root, an object, an object instance or a single
//! resource: `/`, `/3`, `/3/0`, `/3/0/16`.

use crate::errors::{TypesError, TypesResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Path to a node of the device object tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LwM2mPath {
    Root,
    Object(u16),
    ObjectInstance(u16, u16),
    Resource(u16, u16, u16),
}

impl LwM2mPath {
    pub fn object(object_id: u16) -> Self {
        Self::Object(object_id)
    }

    pub fn instance(object_id: u16, instance_id: u16) -> Self {
        Self::ObjectInstance(object_id, instance_id)
    }

    pub fn resource(object_id: u16, instance_id: u16, resource_id: u16) -> Self {
        Self::Resource(object_id, instance_id, resource_id)
    }

    pub fn object_id(&self) -> Option<u16> {
        match *self {
            Self::Root => None,
            Self::Object(o) | Self::ObjectInstance(o, _) | Self::Resource(o, _, _) => Some(o),
        }
    }

    pub fn instance_id(&self) -> Option<u16> {
        match *self {
            Self::ObjectInstance(_, i) | Self::Resource(_, i, _) => Some(i),
            _ => None,
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Self::Root)
    }
}

impl fmt::Display for LwM2mPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "/"),
            Self::Object(o) => write!(f, "/{o}"),
            Self::ObjectInstance(o, i) => write!(f, "/{o}/{i}"),
            Self::Resource(o, i, r) => write!(f, "/{o}/{i}/{r}"),
        }
    }
}

impl FromStr for LwM2mPath {
    type Err = TypesError;

    fn from_str(s: &str) -> TypesResult<Self> {
        let invalid = || TypesError::InvalidPath(s.to_string());
        let trimmed = s.strip_prefix('/').ok_or_else(invalid)?;
        if trimmed.is_empty() {
            return Ok(Self::Root);
        }

        let ids = trimmed
            .split('/')
            .map(|part| part.parse::<u16>().map_err(|_| invalid()))
            .collect::<TypesResult<Vec<u16>>>()?;

        match ids.as_slice() {
            [o] => Ok(Self::Object(*o)),
            [o, i] => Ok(Self::ObjectInstance(*o, *i)),
            [o, i, r] => Ok(Self::Resource(*o, *i, *r)),
            _ => Err(invalid()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_depths() {
        assert_eq!("/".parse::<LwM2mPath>().unwrap(), LwM2mPath::Root);
        assert_eq!("/0".parse::<LwM2mPath>().unwrap(), LwM2mPath::Object(0));
        assert_eq!(
            "/3/0/16".parse::<LwM2mPath>().unwrap(),
            LwM2mPath::Resource(3, 0, 16)
        );
    }

    #[test]
    fn test_rejects_malformed_paths() {
        assert!("3/0".parse::<LwM2mPath>().is_err());
        assert!("/a".parse::<LwM2mPath>().is_err());
        assert!("/1/2/3/4".parse::<LwM2mPath>().is_err());
        assert!("/1//2".parse::<LwM2mPath>().is_err());
    }

    #[test]
    fn test_display_matches_input() {
        let path = LwM2mPath::instance(21, 4);
        assert_eq!(path.to_string(), "/21/4");
        assert_eq!(path.object_id(), Some(21));
        assert_eq!(path.instance_id(), Some(4));
    }
}
