//! CLI-aware wrappers over `canary_config`: load the file named by
//! `--config` and layer the global flags on top.

use canary_config::Config;
use canary_core::{AccessoryConfig, ConnectionConfig};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Load config and apply credential / connection flag overrides.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let path = global.config.clone().unwrap_or_else(canary_config::config_path);
    let mut cfg = canary_config::load_config_from(&path)?;

    if let Some(ref username) = global.username {
        cfg.username = Some(username.clone());
    }
    if let Some(ref password) = global.password {
        cfg.password = Some(password.clone());
    }
    if let Some(ref base_url) = global.base_url {
        cfg.base_url.clone_from(base_url);
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }
    Ok(cfg)
}

pub fn connection(cfg: &Config) -> Result<ConnectionConfig, CliError> {
    Ok(cfg.connection()?)
}

/// The device the command operates on.
///
/// `--serial` wins, then `--accessory`, then the first configured entry.
pub fn accessory(global: &GlobalOpts, cfg: &Config) -> Result<AccessoryConfig, CliError> {
    if let Some(ref serial) = global.serial {
        let (username, password) = cfg.credentials()?;
        return Ok(AccessoryConfig {
            name: serial.clone(),
            serial: serial.clone(),
            model: global.model.clone(),
            username,
            password,
        });
    }

    if let Some(ref name) = global.accessory {
        return Ok(cfg.accessory(name)?);
    }

    let first = cfg.accessories.first().ok_or_else(|| CliError::NoDevice {
        path: config_path(global),
    })?;
    Ok(cfg.accessory(&first.name)?)
}

/// `--output`, then the config file's `output`, then table.
pub fn output_format(global: &GlobalOpts, cfg: &Config) -> OutputFormat {
    use clap::ValueEnum;

    global
        .output
        .or_else(|| OutputFormat::from_str(&cfg.output, true).ok())
        .unwrap_or(OutputFormat::Table)
}

pub fn config_path(global: &GlobalOpts) -> String {
    global
        .config
        .clone()
        .unwrap_or_else(canary_config::config_path)
        .display()
        .to_string()
}
