// ── Sensor resolution ──
//
// Turns the stable identifiers a user configures (serial number, sensor
// name) into the vendor's internal device id and the latest value.
// Holds no cache of its own; freshness comes from the client.

use std::sync::Arc;

use tracing::debug;

use canary_api::{CanaryClient, DeviceId, Reading};

use crate::error::CoreError;
use crate::sensor::{AirQuality, SensorType};

/// Resolves readings for one configured device.
pub struct SensorResolver {
    client: Arc<CanaryClient>,
    serial: String,
    model: String,
}

impl SensorResolver {
    pub fn new(client: Arc<CanaryClient>, serial: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            serial: serial.into(),
            model: model.into(),
        }
    }

    pub fn client(&self) -> &Arc<CanaryClient> {
        &self.client
    }

    pub fn serial(&self) -> &str {
        &self.serial
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The vendor-internal id of the configured serial number.
    pub async fn device_id(&self) -> Result<DeviceId, CoreError> {
        let devices = self.client.devices().await?;

        let id = devices
            .into_iter()
            .find(|d| d.serial_number == self.serial)
            .map(|d| d.id)
            .ok_or_else(|| CoreError::DeviceNotFound {
                serial: self.serial.clone(),
            })?;

        debug!(serial = %self.serial, device_id = %id, "resolved device");
        Ok(id)
    }

    /// Every current reading for the configured device.
    pub async fn readings(&self) -> Result<Vec<Reading>, CoreError> {
        let id = self.device_id().await?;
        Ok(self.client.readings(&id, &self.model).await?)
    }

    /// The latest value of one sensor, by its wire name.
    pub async fn read_sensor(&self, sensor_type: &str) -> Result<f64, CoreError> {
        let readings = self.readings().await?;

        readings
            .iter()
            .find(|r| r.sensor_type == sensor_type)
            .map(|r| r.value)
            .ok_or_else(|| CoreError::SensorNotFound {
                sensor: sensor_type.to_owned(),
            })
    }

    /// Air quality, bucketed onto the 1..=5 scale.
    pub async fn air_quality(&self) -> Result<AirQuality, CoreError> {
        let raw = self.read_sensor(SensorType::AirQuality.as_ref()).await?;
        Ok(AirQuality::from_raw(raw))
    }
}
