// ── Host-facing accessory adapter ──
//
// The host framework asks for characteristic values through getters and
// expects a completion callback. This module is the thin layer between
// that contract and the future-returning resolver.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use canary_api::{CanaryClient, TransportConfig};

use crate::config::{AccessoryConfig, ConnectionConfig};
use crate::error::CoreError;
use crate::resolver::SensorResolver;
use crate::sensor::{AirQuality, SensorType};

/// A configured Canary unit as the host sees it.
///
/// Cheap to clone; clones share the resolver and therefore the client's
/// caches.
#[derive(Clone)]
pub struct Accessory {
    name: String,
    resolver: Arc<SensorResolver>,
}

impl Accessory {
    /// Build an accessory with its own client (and its own session).
    pub fn from_config(
        config: &AccessoryConfig,
        connection: &ConnectionConfig,
    ) -> Result<Self, CoreError> {
        let transport = TransportConfig::default().with_timeout(connection.timeout);
        let client =
            CanaryClient::with_base_url(connection.base_url.clone(), config.credentials(), &transport)?;
        Ok(Self::with_client(config, Arc::new(client)))
    }

    /// Build an accessory on a client shared with other accessories of
    /// the same account.
    pub fn with_client(config: &AccessoryConfig, client: Arc<CanaryClient>) -> Self {
        info!(model = %config.model, serial = %config.serial, "adding Canary accessory");
        let resolver = SensorResolver::new(client, config.serial.clone(), config.model.clone());
        Self {
            name: config.name.clone(),
            resolver: Arc::new(resolver),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resolver(&self) -> &Arc<SensorResolver> {
        &self.resolver
    }

    /// Sensors this accessory registers with the host.
    pub fn services(&self) -> &'static [SensorType] {
        SensorType::for_model(self.resolver.model())
    }

    // ── Getters ──────────────────────────────────────────────────────

    /// Raw reading for a sensor.
    pub async fn value(&self, sensor: SensorType) -> Result<f64, CoreError> {
        self.resolver.read_sensor(sensor.as_ref()).await
    }

    pub async fn temperature(&self) -> Result<f64, CoreError> {
        self.value(SensorType::Temperature).await
    }

    pub async fn humidity(&self) -> Result<f64, CoreError> {
        self.value(SensorType::Humidity).await
    }

    pub async fn battery_level(&self) -> Result<f64, CoreError> {
        self.value(SensorType::Battery).await
    }

    pub async fn air_quality(&self) -> Result<AirQuality, CoreError> {
        self.resolver.air_quality().await
    }

    /// The value the host's characteristic expects for `sensor`.
    ///
    /// Identical to [`value`](Self::value) except for air quality, which
    /// the host models as a 1..=5 category rather than a raw reading.
    pub async fn characteristic_value(&self, sensor: SensorType) -> Result<f64, CoreError> {
        match sensor {
            SensorType::AirQuality => Ok(f64::from(self.air_quality().await?.level())),
            other => self.value(other).await,
        }
    }

    /// Callback-style getter for hosts without async support.
    ///
    /// Spawns the read on the current tokio runtime and hands the result
    /// to `callback`. Errors are logged here and passed on unchanged.
    pub fn get_with_callback<F>(&self, sensor: SensorType, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<f64, CoreError>) + Send + 'static,
    {
        let accessory = self.clone();
        tokio::spawn(async move {
            let result = accessory.characteristic_value(sensor).await;
            if let Err(ref e) = result {
                warn!(accessory = %accessory.name, %sensor, error = %e, "sensor read failed");
            }
            callback(result);
        })
    }
}
