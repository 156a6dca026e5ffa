//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use canary_config::ConfigError;
use canary_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(unused_assignments)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the Canary API: {message}")]
    #[diagnostic(
        code(canary::connection_failed),
        help(
            "Check your network connection.\n\
             Override the API origin with --base-url if you use a proxy."
        )
    )]
    ConnectionFailed { message: String, status: Option<u16> },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(canary::auth_failed),
        help("Verify your e-mail and password by signing in at https://my.canary.is")
    )]
    AuthFailed { message: String },

    #[error("No {what} configured")]
    #[diagnostic(
        code(canary::no_credentials),
        help(
            "Pass --username / --password, set CANARY_USERNAME and CANARY_PASSWORD,\n\
             or add them to {path}"
        )
    )]
    NoCredentials { what: &'static str, path: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(canary::not_found),
        help("Run: canary {list_command} to see what is available")
    )]
    NotFound {
        resource_type: &'static str,
        identifier: String,
        list_command: &'static str,
    },

    #[error("No device selected")]
    #[diagnostic(
        code(canary::no_device),
        help(
            "Pass --serial, pick an entry with --accessory,\n\
             or add an [[accessories]] entry to {path}"
        )
    )]
    NoDevice { path: String },

    // ── Validation / configuration ───────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(canary::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(canary::config))]
    Config(Box<ConfigError>),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(canary::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NoDevice { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Network { message, status } => CliError::ConnectionFailed { message, status },

            CoreError::DeviceNotFound { serial } => CliError::NotFound {
                resource_type: "device",
                identifier: serial,
                list_command: "devices",
            },

            CoreError::SensorNotFound { sensor } => CliError::NotFound {
                resource_type: "sensor",
                identifier: sensor,
                list_command: "read",
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingCredentials { what } => CliError::NoCredentials {
                what,
                path: canary_config::config_path().display().to_string(),
            },
            ConfigError::UnknownAccessory { name } => CliError::NotFound {
                resource_type: "accessory",
                identifier: name,
                list_command: "config show",
            },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let cases = [
            (
                CoreError::AuthenticationFailed {
                    message: "no XSRF token".into(),
                },
                exit_code::AUTH,
            ),
            (
                CoreError::Network {
                    message: "503".into(),
                    status: Some(503),
                },
                exit_code::CONNECTION,
            ),
            (
                CoreError::DeviceNotFound {
                    serial: "S9".into(),
                },
                exit_code::NOT_FOUND,
            ),
            (
                CoreError::SensorNotFound {
                    sensor: "humidity".into(),
                },
                exit_code::NOT_FOUND,
            ),
            (
                CoreError::Config {
                    message: "bad url".into(),
                },
                exit_code::USAGE,
            ),
        ];

        for (core, code) in cases {
            assert_eq!(CliError::from(core).exit_code(), code);
        }
    }

    #[test]
    fn missing_credentials_are_auth_errors() {
        let err = CliError::from(ConfigError::MissingCredentials { what: "password" });
        assert_eq!(err.exit_code(), exit_code::AUTH);
        assert_eq!(err.to_string(), "No password configured");
    }
}
