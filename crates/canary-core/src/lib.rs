//! Sensor layer between `canary-api` and host consumers (accessory
//! bridges, the CLI).
//!
//! - **[`SensorResolver`]**: maps a configured serial number to the
//!   vendor's device id and a sensor name to its latest value. All
//!   freshness comes from the client's caches.
//!
//! - **[`Accessory`]**: the host-facing adapter: per-sensor getters,
//!   the sensors a model exposes, and a callback-style getter for hosts
//!   that cannot await.
//!
//! - **[`Poller`]**: optional background task that keeps a device's
//!   readings warm on a fixed interval and publishes snapshots on a
//!   `watch` channel.
//!
//! - **Sensor vocabulary** ([`sensor`]): [`SensorType`], the
//!   [`AirQuality`] scale, and [`air_quality_category`].

pub mod accessory;
pub mod config;
pub mod error;
pub mod poller;
pub mod resolver;
pub mod sensor;

// ── Primary re-exports ──────────────────────────────────────────────
pub use accessory::Accessory;
pub use config::{AccessoryConfig, ConnectionConfig};
pub use error::CoreError;
pub use poller::{Poller, ReadingsSnapshot, SnapshotReceiver};
pub use resolver::SensorResolver;
pub use sensor::{AirQuality, SensorType, air_quality_category};

pub use canary_api::{
    CacheTtls, CanaryClient, Credentials, DEFAULT_BASE_URL, Device, DeviceId, Reading, TransportConfig,
};
