//! # Bootstrap Messages
//!
//! Uplink bootstrap request and the downlink requests the bootstrap server
//! sends back, with their responses. Byte-level encoding belongs to the
//! transport and is not modelled here.

use crate::modes::ContentFormat;
use crate::node::ObjectTree;
use crate::path::LwM2mPath;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Bootstrap-Request received from a device.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BootstrapRequest {
    /// `ep` parameter; optional since LWM2M 1.1.
    pub endpoint_name: Option<String>,
    /// `pct` parameter.
    pub preferred_content_format: Option<ContentFormat>,
    pub additional_attributes: BTreeMap<String, String>,
}

impl BootstrapRequest {
    pub fn new(endpoint_name: impl Into<String>) -> Self {
        Self {
            endpoint_name: Some(endpoint_name.into()),
            ..Self::default()
        }
    }

    pub fn with_preferred_content_format(mut self, format: ContentFormat) -> Self {
        self.preferred_content_format = Some(format);
        self
    }
}

/// Request sent by the bootstrap server to the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DownlinkRequest {
    Discover {
        path: LwM2mPath,
    },
    Read {
        path: LwM2mPath,
        content_format: ContentFormat,
    },
    /// Bootstrap-Write. `tree` holds the instances written under `path`.
    Write {
        path: LwM2mPath,
        tree: ObjectTree,
        content_format: ContentFormat,
    },
    Delete {
        path: LwM2mPath,
    },
    Finish,
}

impl DownlinkRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Discover { .. } => "discover",
            Self::Read { .. } => "read",
            Self::Write { .. } => "write",
            Self::Delete { .. } => "delete",
            Self::Finish => "finish",
        }
    }

    pub fn path(&self) -> Option<LwM2mPath> {
        match self {
            Self::Discover { path }
            | Self::Read { path, .. }
            | Self::Write { path, .. }
            | Self::Delete { path } => Some(*path),
            Self::Finish => None,
        }
    }
}

impl fmt::Display for DownlinkRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path() {
            Some(path) => write!(f, "{} {}", self.kind(), path),
            None => write!(f, "{}", self.kind()),
        }
    }
}

/// CoAP response codes relevant to bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseCode {
    Changed,
    Deleted,
    Content,
    BadRequest,
    Unauthorized,
    NotFound,
    MethodNotAllowed,
    NotAcceptable,
    InternalServerError,
}

impl ResponseCode {
    pub fn is_success(self) -> bool {
        matches!(self, Self::Changed | Self::Deleted | Self::Content)
    }

    /// CoAP dotted notation, e.g. `4.00`.
    pub fn as_coap(self) -> &'static str {
        match self {
            Self::Changed => "2.04",
            Self::Deleted => "2.02",
            Self::Content => "2.05",
            Self::BadRequest => "4.00",
            Self::Unauthorized => "4.01",
            Self::NotFound => "4.04",
            Self::MethodNotAllowed => "4.05",
            Self::NotAcceptable => "4.06",
            Self::InternalServerError => "5.00",
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.as_coap(), self)
    }
}

/// Entry of a discover response, e.g. `</1>;ver=1.1` or `</0/1>;ssid=101`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub path: LwM2mPath,
    /// `ver` attribute, set on objects not implemented at version 1.0.
    pub version: Option<String>,
    /// `ssid` attribute, set on Security and Server instances of
    /// device management servers. A Security instance without it belongs to
    /// the bootstrap server.
    pub short_server_id: Option<u16>,
}

impl Link {
    pub fn new(path: LwM2mPath) -> Self {
        Self {
            path,
            version: None,
            short_server_id: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_ssid(mut self, short_server_id: u16) -> Self {
        self.short_server_id = Some(short_server_id);
        self
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.path)?;
        if let Some(version) = &self.version {
            write!(f, ";ver={version}")?;
        }
        if let Some(ssid) = self.short_server_id {
            write!(f, ";ssid={ssid}")?;
        }
        Ok(())
    }
}

/// Response to a downlink request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub code: ResponseCode,
    pub error_message: Option<String>,
    /// Discover payload.
    pub links: Vec<Link>,
}

impl Response {
    pub fn success(code: ResponseCode) -> Self {
        Self {
            code,
            error_message: None,
            links: Vec::new(),
        }
    }

    pub fn changed() -> Self {
        Self::success(ResponseCode::Changed)
    }

    pub fn deleted() -> Self {
        Self::success(ResponseCode::Deleted)
    }

    pub fn discovered(links: Vec<Link>) -> Self {
        Self {
            code: ResponseCode::Content,
            error_message: None,
            links,
        }
    }

    pub fn error(code: ResponseCode, message: impl Into<String>) -> Self {
        Self {
            code,
            error_message: Some(message.into()),
            links: Vec::new(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::error(ResponseCode::BadRequest, message)
    }

    pub fn is_success(&self) -> bool {
        self.code.is_success()
    }
}
