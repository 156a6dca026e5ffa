// Wire types for the Canary cloud API.
//
// Only the fields the bridge reads are typed; everything else the vendor
// sends is ignored by serde.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Vendor-internal identifier of a location or device.
///
/// The API has sent both JSON numbers and strings for ids over time;
/// both normalize to the textual form used in query strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ApiId(String);

pub type DeviceId = ApiId;
pub type LocationId = ApiId;

impl ApiId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ApiId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for ApiId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl<'de> Deserialize<'de> for ApiId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Number(n) => Self(n.to_string()),
        })
    }
}

/// A monitored site holding one or more devices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub devices: Vec<Device>,
}

/// A Canary unit as listed under a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub serial_number: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub device_mode: Option<String>,
    #[serde(default)]
    pub online: Option<bool>,
}

/// One sensor's latest value for a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub sensor_type: String,
    pub value: f64,
    /// Vendor timestamp, passed through as sent.
    #[serde(default)]
    pub created: Option<String>,
}

/// The `type` query value of the readings endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingKind {
    Canary,
    Flex,
}

impl ReadingKind {
    /// Flex units use their own readings feed; every other model
    /// (All-in-One, View, ...) shares the `canary` feed.
    pub fn for_model(model: &str) -> Self {
        if model.eq_ignore_ascii_case("flex") {
            Self::Flex
        } else {
            Self::Canary
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Canary => "canary",
            Self::Flex => "flex",
        }
    }
}

impl fmt::Display for ReadingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of a successful `POST /api/auth/login`.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}
