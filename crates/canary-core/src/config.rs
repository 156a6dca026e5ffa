// ── Runtime accessory configuration ──
//
// These types describe *what* to expose and *how* to reach the vendor.
// They carry credential data but never touch disk; `canary-config`
// builds them from files and the environment.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use canary_api::Credentials;

/// One configured accessory: a single Canary unit on one account.
#[derive(Debug, Clone)]
pub struct AccessoryConfig {
    /// Display name used for the host's services.
    pub name: String,
    /// Serial number printed on the unit.
    pub serial: String,
    /// Hardware model, e.g. `AllInOne` or `Flex`.
    pub model: String,
    pub username: String,
    pub password: SecretString,
}

impl AccessoryConfig {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }
}

/// How to reach the vendor API.
///
/// `canary-config` fills in the production origin when none is set.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub base_url: Url,
    /// Per-request timeout, login included.
    pub timeout: Duration,
}
