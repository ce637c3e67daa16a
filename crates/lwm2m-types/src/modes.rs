//! Security modes, bindings, certificate usages and content formats.

use crate::errors::{TypesError, TypesResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Security mode resource `/0/x/2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecurityMode {
    Psk,
    Rpk,
    X509,
    NoSec,
    Est,
}

impl SecurityMode {
    pub fn code(self) -> i64 {
        match self {
            Self::Psk => 0,
            Self::Rpk => 1,
            Self::X509 => 2,
            Self::NoSec => 3,
            Self::Est => 4,
        }
    }

    pub fn from_code(code: i64) -> TypesResult<Self> {
        match code {
            0 => Ok(Self::Psk),
            1 => Ok(Self::Rpk),
            2 => Ok(Self::X509),
            3 => Ok(Self::NoSec),
            4 => Ok(Self::Est),
            other => Err(TypesError::UnknownSecurityMode(other)),
        }
    }
}

/// Certificate usage resource `/0/x/15` (DANE semantics).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CertificateUsage {
    CaConstraint,
    ServiceCertificateConstraint,
    TrustAnchorAssertion,
    #[default]
    DomainIssuerCertificate,
}

impl CertificateUsage {
    pub fn code(self) -> i64 {
        match self {
            Self::CaConstraint => 0,
            Self::ServiceCertificateConstraint => 1,
            Self::TrustAnchorAssertion => 2,
            Self::DomainIssuerCertificate => 3,
        }
    }

    pub fn from_code(code: i64) -> TypesResult<Self> {
        match code {
            0 => Ok(Self::CaConstraint),
            1 => Ok(Self::ServiceCertificateConstraint),
            2 => Ok(Self::TrustAnchorAssertion),
            3 => Ok(Self::DomainIssuerCertificate),
            other => Err(TypesError::UnknownCertificateUsage(other)),
        }
    }
}

/// Single transport binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BindingMode {
    /// UDP
    U,
    /// TCP
    T,
    /// SMS
    S,
    /// Non-IP
    N,
    /// Queue mode (LWM2M 1.0 only, kept for parsing)
    Q,
}

impl BindingMode {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'U' => Some(Self::U),
            'T' => Some(Self::T),
            'S' => Some(Self::S),
            'N' => Some(Self::N),
            'Q' => Some(Self::Q),
            _ => None,
        }
    }

    fn as_char(self) -> char {
        match self {
            Self::U => 'U',
            Self::T => 'T',
            Self::S => 'S',
            Self::N => 'N',
            Self::Q => 'Q',
        }
    }
}

/// Set of bindings as found in `/1/x/7` or `/3/0/16`, e.g. `"UQ"`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BindingModes(BTreeSet<BindingMode>);

impl BindingModes {
    pub fn new(modes: impl IntoIterator<Item = BindingMode>) -> Self {
        Self(modes.into_iter().collect())
    }

    pub fn contains(&self, mode: BindingMode) -> bool {
        self.0.contains(&mode)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = BindingMode> + '_ {
        self.0.iter().copied()
    }
}

impl FromStr for BindingModes {
    type Err = TypesError;

    fn from_str(s: &str) -> TypesResult<Self> {
        let invalid = |reason: String| TypesError::InvalidBinding {
            value: s.to_string(),
            reason,
        };
        if s.is_empty() {
            return Err(invalid("binding must not be empty".into()));
        }

        let mut modes = BTreeSet::new();
        for c in s.chars() {
            let mode = BindingMode::from_char(c)
                .ok_or_else(|| invalid(format!("unknown binding mode '{c}'")))?;
            if !modes.insert(mode) {
                return Err(invalid(format!("binding mode '{c}' repeated")));
            }
        }
        Ok(Self(modes))
    }
}

impl fmt::Display for BindingModes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|m| write!(f, "{}", m.as_char()))
    }
}

/// CoAP content formats used for bootstrap payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ContentFormat {
    Text,
    LinkFormat,
    Opaque,
    Cbor,
    SenmlJson,
    SenmlCbor,
    #[default]
    Tlv,
    Json,
}

impl ContentFormat {
    pub fn code(self) -> u16 {
        match self {
            Self::Text => 0,
            Self::LinkFormat => 40,
            Self::Opaque => 42,
            Self::Cbor => 60,
            Self::SenmlJson => 110,
            Self::SenmlCbor => 112,
            Self::Tlv => 11542,
            Self::Json => 11543,
        }
    }

    pub fn from_code(code: u16) -> TypesResult<Self> {
        match code {
            0 => Ok(Self::Text),
            40 => Ok(Self::LinkFormat),
            42 => Ok(Self::Opaque),
            60 => Ok(Self::Cbor),
            110 => Ok(Self::SenmlJson),
            112 => Ok(Self::SenmlCbor),
            11542 => Ok(Self::Tlv),
            11543 => Ok(Self::Json),
            other => Err(TypesError::UnknownContentFormat(other)),
        }
    }

    /// Parse either a numeric code or a mnemonic such as `TLV` or `SENML_CBOR`.
    pub fn parse_name(value: &str) -> TypesResult<Self> {
        if let Ok(code) = value.parse::<u16>() {
            return Self::from_code(code);
        }
        match value.to_ascii_uppercase().replace('-', "_").as_str() {
            "TEXT" => Ok(Self::Text),
            "LINK" | "LINK_FORMAT" => Ok(Self::LinkFormat),
            "OPAQUE" => Ok(Self::Opaque),
            "CBOR" => Ok(Self::Cbor),
            "SENML_JSON" => Ok(Self::SenmlJson),
            "SENML_CBOR" => Ok(Self::SenmlCbor),
            "TLV" => Ok(Self::Tlv),
            "JSON" => Ok(Self::Json),
            _ => Err(TypesError::UnknownContentFormat(u16::MAX)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_parse() {
        let modes: BindingModes = "UQ".parse().unwrap();
        assert!(modes.contains(BindingMode::U));
        assert!(modes.contains(BindingMode::Q));
        assert!(!modes.contains(BindingMode::T));
        assert_eq!(modes.to_string(), "UQ");
    }

    #[test]
    fn test_binding_rejects_garbage() {
        assert!("".parse::<BindingModes>().is_err());
        assert!("UX".parse::<BindingModes>().is_err());
        assert!("UU".parse::<BindingModes>().is_err());
    }

    #[test]
    fn test_security_mode_codes() {
        assert_eq!(SecurityMode::from_code(3).unwrap(), SecurityMode::NoSec);
        assert!(SecurityMode::from_code(7).is_err());
    }

    #[test]
    fn test_content_format_names() {
        assert_eq!(ContentFormat::parse_name("tlv").unwrap(), ContentFormat::Tlv);
        assert_eq!(ContentFormat::parse_name("senml-cbor").unwrap(), ContentFormat::SenmlCbor);
        assert_eq!(ContentFormat::parse_name("110").unwrap(), ContentFormat::SenmlJson);
        assert!(ContentFormat::parse_name("xml").is_err());
        assert_eq!(ContentFormat::default().code(), 11542);
    }
}
