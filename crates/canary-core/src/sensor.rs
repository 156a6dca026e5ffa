// ── Sensor vocabulary ──
//
// Sensor type names as the readings endpoint spells them, which sensors
// each hardware model exposes, and the categorical air-quality scale.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// A sensor reported by the readings endpoint.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SensorType {
    Temperature,
    Humidity,
    Battery,
    AirQuality,
}

impl SensorType {
    /// Sensors exposed for a hardware model.
    ///
    /// All-in-One units report climate and air quality; Flex units only
    /// report their battery. Other models expose nothing.
    pub fn for_model(model: &str) -> &'static [SensorType] {
        if model.eq_ignore_ascii_case("allinone") {
            &[Self::Temperature, Self::Humidity, Self::AirQuality]
        } else if model.eq_ignore_ascii_case("flex") {
            &[Self::Battery]
        } else {
            &[]
        }
    }
}

/// Air quality on the host's five-step scale (1 = best).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display)]
pub enum AirQuality {
    Excellent,
    Good,
    Fair,
    Inferior,
    Poor,
}

impl AirQuality {
    /// Bucket a raw air-quality reading. Upper bounds are inclusive.
    pub fn from_raw(raw: f64) -> Self {
        if raw <= 0.3 {
            Self::Excellent
        } else if raw <= 0.4 {
            Self::Good
        } else if raw <= 0.5 {
            Self::Fair
        } else if raw <= 0.6 {
            Self::Inferior
        } else {
            Self::Poor
        }
    }

    /// Numeric level, 1 through 5.
    pub fn level(self) -> u8 {
        match self {
            Self::Excellent => 1,
            Self::Good => 2,
            Self::Fair => 3,
            Self::Inferior => 4,
            Self::Poor => 5,
        }
    }
}

/// Map a raw `air_quality` reading onto the 1..=5 category scale.
pub fn air_quality_category(raw: f64) -> AirQuality {
    AirQuality::from_raw(raw)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn category_boundaries() {
        assert_eq!(air_quality_category(0.0).level(), 1);
        assert_eq!(air_quality_category(0.3).level(), 1);
        assert_eq!(air_quality_category(0.31).level(), 2);
        assert_eq!(air_quality_category(0.4).level(), 2);
        assert_eq!(air_quality_category(0.45).level(), 3);
        assert_eq!(air_quality_category(0.5).level(), 3);
        assert_eq!(air_quality_category(0.6).level(), 4);
        assert_eq!(air_quality_category(0.61).level(), 5);
        assert_eq!(air_quality_category(3.0).level(), 5);
    }

    #[test]
    fn category_is_monotonic() {
        let mut previous = air_quality_category(-1.0);
        for step in 0..=1_000u32 {
            let current = air_quality_category(f64::from(step) / 1_000.0);
            assert!(current >= previous, "category dropped at step {step}");
            previous = current;
        }
        assert_eq!(previous, AirQuality::Poor);
    }

    #[test]
    fn nan_is_poor() {
        assert_eq!(air_quality_category(f64::NAN), AirQuality::Poor);
    }

    #[test]
    fn sensor_names_match_the_wire() {
        assert_eq!(SensorType::AirQuality.to_string(), "air_quality");
        assert_eq!(SensorType::from_str("temperature").unwrap(), SensorType::Temperature);
        assert!(SensorType::from_str("co2").is_err());
        assert_eq!(SensorType::iter().count(), 4);
    }

    #[test]
    fn sensors_per_model() {
        assert_eq!(
            SensorType::for_model("AllInOne"),
            &[
                SensorType::Temperature,
                SensorType::Humidity,
                SensorType::AirQuality
            ]
        );
        assert_eq!(SensorType::for_model("Flex"), &[SensorType::Battery]);
        assert!(SensorType::for_model("View").is_empty());
    }
}
