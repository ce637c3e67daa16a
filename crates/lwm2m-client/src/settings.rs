//! Runtime settings of the device-side bootstrap handler.

use std::env;
use std::time::Duration;
use tracing::warn;

/// Default time a device waits for the bootstrap server to finish.
pub const DEFAULT_BOOTSTRAP_WAIT: Duration = Duration::from_secs(93);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BootstrapHandlerSettings {
    /// Bound used by `wait_bootstrap_finished_default`
    pub wait_timeout: Duration,
}

impl Default for BootstrapHandlerSettings {
    fn default() -> Self {
        Self {
            wait_timeout: DEFAULT_BOOTSTRAP_WAIT,
        }
    }
}

impl BootstrapHandlerSettings {
    /// # Environment Variables
    ///
    /// - `LWM2M_CLIENT_BOOTSTRAP_WAIT_SECS` (default: 93)
    ///
    /// Unparseable or zero values keep the default.
    pub fn from_env() -> Self {
        Self::from_value(env::var("LWM2M_CLIENT_BOOTSTRAP_WAIT_SECS").ok())
    }

    fn from_value(value: Option<String>) -> Self {
        let wait_timeout = match value {
            None => DEFAULT_BOOTSTRAP_WAIT,
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!(value = %value, "Ignoring LWM2M_CLIENT_BOOTSTRAP_WAIT_SECS");
                    DEFAULT_BOOTSTRAP_WAIT
                }
            },
        };
        Self { wait_timeout }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_from_env_value() {
        let settings = BootstrapHandlerSettings::from_value(Some("30".into()));
        assert_eq!(settings.wait_timeout, Duration::from_secs(30));

        // accepted as is, the wait itself copes with it
        let settings = BootstrapHandlerSettings::from_value(Some(u64::MAX.to_string()));
        assert_eq!(settings.wait_timeout, Duration::from_secs(u64::MAX));
    }

    #[test]
    fn test_invalid_wait_keeps_default() {
        for value in ["", "0", "-1", "soon", "18446744073709551616"] {
            let settings = BootstrapHandlerSettings::from_value(Some(value.into()));
            assert_eq!(settings, BootstrapHandlerSettings::default(), "value {value:?}");
        }
        assert_eq!(
            BootstrapHandlerSettings::from_value(None).wait_timeout,
            DEFAULT_BOOTSTRAP_WAIT
        );
    }
}
