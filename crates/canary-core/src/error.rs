// ── Core error types ──
//
// What the accessory layer sees. HTTP details are flattened into the
// three classes the host cares about: the login broke, the network broke,
// or the thing asked for does not exist.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Network error: {message}")]
    Network {
        message: String,
        /// HTTP status code (if the vendor answered at all).
        status: Option<u16>,
    },

    #[error("device {serial} not found")]
    DeviceNotFound { serial: String },

    #[error("sensor {sensor} not found")]
    SensorNotFound { sensor: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Returns `true` for unknown serial numbers and unknown sensor types.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DeviceNotFound { .. } | Self::SensorNotFound { .. })
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<canary_api::Error> for CoreError {
    fn from(err: canary_api::Error) -> Self {
        match err {
            canary_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            canary_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            canary_api::Error::Http(message) => CoreError::Config { message },
            other => CoreError::Network {
                status: other.status(),
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_messages() {
        let device = CoreError::DeviceNotFound {
            serial: "C100".into(),
        };
        let sensor = CoreError::SensorNotFound {
            sensor: "humidity".into(),
        };
        assert_eq!(device.to_string(), "device C100 not found");
        assert_eq!(sensor.to_string(), "sensor humidity not found");
        assert!(device.is_not_found() && sensor.is_not_found());
    }

    #[test]
    fn api_errors_map_to_classes() {
        let auth: CoreError = canary_api::Error::Authentication {
            message: "no XSRF token".into(),
        }
        .into();
        assert!(auth.is_auth());

        let status: CoreError = canary_api::Error::Status {
            status: 502,
            url: "https://my.canary.is/api/locations".into(),
            body: String::new(),
        }
        .into();
        assert!(matches!(
            status,
            CoreError::Network {
                status: Some(502),
                ..
            }
        ));
    }
}
