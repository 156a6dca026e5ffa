//! Configuration for the Canary bridge.
//!
//! A TOML file with account credentials and the accessories to expose,
//! merged with `CANARY_*` environment variables, and translated into
//! `canary_core`'s runtime types.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use canary_core::{AccessoryConfig, ConnectionConfig, DEFAULT_BASE_URL};

/// Environment variable that overrides the file's `password` at load.
pub const PASSWORD_ENV: &str = "CANARY_PASSWORD";

const ENV_PREFIX: &str = "CANARY_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no {what} configured")]
    MissingCredentials { what: &'static str },

    #[error("no accessory named '{name}'")]
    UnknownAccessory { name: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Account e-mail.
    pub username: Option<String>,

    /// Account password (plaintext; prefer `CANARY_PASSWORD`, which
    /// replaces this at load).
    pub password: Option<String>,

    /// Vendor API origin.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Default CLI output format.
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub accessories: Vec<AccessoryEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            base_url: default_base_url(),
            timeout: default_timeout(),
            output: default_output(),
            accessories: Vec::new(),
        }
    }
}

/// One Canary unit to expose.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccessoryEntry {
    pub name: String,
    pub serial: String,
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}
fn default_timeout() -> u64 {
    30
}
fn default_output() -> String {
    "table".into()
}
fn default_model() -> String {
    "AllInOne".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("is", "canary", "canary-bridge").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("canary-bridge");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load from `path` plus environment. A missing file yields defaults.
///
/// Environment values override the file; callers layer explicit
/// overrides (CLI flags) on the returned value.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).only(&["username", "password", "base_url", "timeout"]));

    Ok(figment.extract()?)
}

// ── Translation to runtime types ────────────────────────────────────

impl Config {
    /// Username and password as loaded (file, then environment, then
    /// any overrides the caller applied).
    pub fn credentials(&self) -> Result<(String, SecretString), ConfigError> {
        let username = self
            .username
            .clone()
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::MissingCredentials { what: "username" })?;

        let password = self
            .password
            .clone()
            .ok_or(ConfigError::MissingCredentials { what: "password" })?;
        Ok((username, SecretString::from(password)))
    }

    pub fn connection(&self) -> Result<ConnectionConfig, ConfigError> {
        let base_url = Url::parse(&self.base_url).map_err(|e| ConfigError::Validation {
            field: "base_url".into(),
            reason: format!("{e}: {}", self.base_url),
        })?;
        if self.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }

        Ok(ConnectionConfig {
            base_url,
            timeout: Duration::from_secs(self.timeout),
        })
    }

    /// Runtime configs for every listed accessory.
    pub fn accessory_configs(&self) -> Result<Vec<AccessoryConfig>, ConfigError> {
        if self.accessories.is_empty() {
            return Ok(Vec::new());
        }
        let (username, password) = self.credentials()?;

        Ok(self
            .accessories
            .iter()
            .map(|entry| entry.to_runtime(&username, &password))
            .collect())
    }

    /// Runtime config for the accessory called `name`.
    pub fn accessory(&self, name: &str) -> Result<AccessoryConfig, ConfigError> {
        let entry = self
            .accessories
            .iter()
            .find(|a| a.name == name)
            .ok_or_else(|| ConfigError::UnknownAccessory { name: name.into() })?;
        let (username, password) = self.credentials()?;
        Ok(entry.to_runtime(&username, &password))
    }
}

impl AccessoryEntry {
    fn to_runtime(&self, username: &str, password: &SecretString) -> AccessoryConfig {
        AccessoryConfig {
            name: self.name.clone(),
            serial: self.serial.clone(),
            model: self.model.clone(),
            username: username.to_owned(),
            password: password.clone(),
        }
    }
}
