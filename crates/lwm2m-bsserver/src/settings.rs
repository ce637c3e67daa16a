//! Runtime settings of the bootstrap server.

use crate::error::{BootstrapError, BootstrapResult};
use lwm2m_types::ContentFormat;
use std::env;
use std::time::Duration;
use tracing::warn;

/// Default per-request timeout, above CoAP MAX_TRANSMIT_WAIT (93 s).
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Default bound on a whole session.
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(300);

/// Default event bus capacity.
pub const DEFAULT_EVENT_CAPACITY: usize = 1000;

/// Bootstrap server settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BootstrapServerSettings {
    /// Time to wait for the response of one downlink request
    pub request_timeout: Duration,
    /// Deadline after which a running session is cancelled
    pub session_timeout: Duration,
    /// Buffer of the session event bus
    pub event_capacity: usize,
    /// Content format used when neither the configuration nor the device
    /// asks for one
    pub default_content_format: ContentFormat,
}

impl Default for BootstrapServerSettings {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            session_timeout: DEFAULT_SESSION_TIMEOUT,
            event_capacity: DEFAULT_EVENT_CAPACITY,
            default_content_format: ContentFormat::Tlv,
        }
    }
}

impl BootstrapServerSettings {
    /// Settings from environment variables; unset, unparseable or zero
    /// values keep their default.
    ///
    /// # Environment Variables
    ///
    /// - `LWM2M_BS_REQUEST_TIMEOUT_SECS` (default: 120)
    /// - `LWM2M_BS_SESSION_TIMEOUT_SECS` (default: 300)
    /// - `LWM2M_BS_EVENT_CAPACITY` (default: 1000)
    /// - `LWM2M_BS_DEFAULT_CONTENT_FORMAT`: code or name, e.g. `11542` or `tlv`
    ///   (default: TLV)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            request_timeout: parse_positive::<u64>(&lookup, "LWM2M_BS_REQUEST_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            session_timeout: parse_positive::<u64>(&lookup, "LWM2M_BS_SESSION_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.session_timeout),
            event_capacity: parse_positive::<usize>(&lookup, "LWM2M_BS_EVENT_CAPACITY")
                .unwrap_or(defaults.event_capacity),
            default_content_format: lookup("LWM2M_BS_DEFAULT_CONTENT_FORMAT")
                .and_then(|v| match ContentFormat::parse_name(&v) {
                    Ok(format) => Some(format),
                    Err(e) => {
                        warn!(value = %v, error = %e, "Ignoring LWM2M_BS_DEFAULT_CONTENT_FORMAT");
                        None
                    }
                })
                .unwrap_or(defaults.default_content_format),
        }
    }

    pub fn validate(&self) -> BootstrapResult<()> {
        let invalid = |reason: &str| {
            Err(BootstrapError::InvalidSettings {
                reason: reason.to_string(),
            })
        };
        if self.request_timeout.is_zero() {
            return invalid("request timeout must be positive");
        }
        if self.session_timeout.is_zero() {
            return invalid("session timeout must be positive");
        }
        if self.event_capacity == 0 {
            return invalid("event capacity must be positive");
        }
        Ok(())
    }
}

fn parse_positive<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T>
where
    T: std::str::FromStr + Default + PartialEq,
{
    let value = lookup(name)?;
    match value.trim().parse::<T>() {
        Ok(parsed) if parsed != T::default() => Some(parsed),
        _ => {
            warn!(variable = name, value = %value, "Ignoring invalid setting");
            None
        }
    }
}
