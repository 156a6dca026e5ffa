//! `canary read [SENSOR]`: current values of the selected device.

use serde::Serialize;
use tabled::Tabled;

use canary_config::Config;
use canary_core::{Accessory, AirQuality, Reading, SensorType};

use crate::cli::{GlobalOpts, ReadArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
pub(crate) struct ReadingRow {
    #[tabled(rename = "Sensor")]
    sensor: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Reported")]
    created: String,
}

pub(crate) fn reading_row(r: &Reading) -> ReadingRow {
    let value = if r.sensor_type == SensorType::AirQuality.as_ref() {
        format!("{} ({})", r.value, AirQuality::from_raw(r.value))
    } else {
        r.value.to_string()
    };
    ReadingRow {
        sensor: r.sensor_type.clone(),
        value,
        created: r.created.clone().unwrap_or_else(|| "-".into()),
    }
}

pub(crate) fn plain(r: &Reading) -> String {
    format!("{}\t{}", r.sensor_type, r.value)
}

#[derive(Serialize)]
struct SensorValue {
    sensor: SensorType,
    value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<AirQuality>,
}

/// Build the accessory the global flags select.
pub(crate) fn selected_accessory(cfg: &Config, global: &GlobalOpts) -> Result<Accessory, CliError> {
    let acc = config::accessory(global, cfg)?;
    let conn = config::connection(cfg)?;
    Ok(Accessory::from_config(&acc, &conn)?)
}

pub async fn handle(args: ReadArgs, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let accessory = selected_accessory(cfg, global)?;
    let format = config::output_format(global, cfg);

    let out = match args.sensor {
        Some(sensor) => {
            let value = accessory.value(sensor).await?;
            let category = (sensor == SensorType::AirQuality).then(|| AirQuality::from_raw(value));
            let text = match category {
                Some(c) => format!("{value} ({c})"),
                None => value.to_string(),
            };
            output::render_value(
                format,
                &SensorValue {
                    sensor,
                    value,
                    category,
                },
                &text,
            )?
        }
        None => {
            let readings = accessory.resolver().readings().await?;
            output::render_list(format, &readings, reading_row, plain)?
        }
    };

    output::print_output(&out, global.quiet);
    Ok(())
}
