//! `canary devices`: every unit on the account.

use std::sync::Arc;

use tabled::Tabled;

use canary_config::Config;
use canary_core::{CanaryClient, CoreError, Credentials, Device, TransportConfig};

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Serial")]
    serial: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Online")]
    online: String,
}

fn device_row(d: &Device) -> DeviceRow {
    DeviceRow {
        serial: d.serial_number.clone(),
        name: d.name.clone().unwrap_or_default(),
        id: d.id.to_string(),
        mode: d.device_mode.clone().unwrap_or_else(|| "-".into()),
        online: d.online.map_or_else(|| "-".into(), |o| String::from(if o { "yes" } else { "no" })),
    }
}

/// An account-level client; no device has to be selected.
fn account_client(cfg: &Config) -> Result<Arc<CanaryClient>, CliError> {
    let conn = config::connection(cfg)?;
    let (username, password) = cfg.credentials()?;
    let transport = TransportConfig::default().with_timeout(conn.timeout);

    let client = CanaryClient::with_base_url(conn.base_url, Credentials::new(username, password), &transport)
        .map_err(CoreError::from)?;
    Ok(Arc::new(client))
}

pub async fn handle(cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let client = account_client(cfg)?;
    let devices = client.devices().await.map_err(CoreError::from)?;

    let out = output::render_list(
        config::output_format(global, cfg),
        &devices,
        device_row,
        |d| d.serial_number.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
