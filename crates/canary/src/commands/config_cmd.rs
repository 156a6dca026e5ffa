//! Config subcommand handlers.

use canary_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

pub fn handle(args: &ConfigArgs, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path(global), global.quiet);
            Ok(())
        }
        ConfigCommand::Show => {
            let mut shown = cfg.clone();
            if shown.password.is_some() {
                shown.password = Some(REDACTED.into());
            }

            let out = match config::output_format(global, cfg) {
                OutputFormat::Json => serde_json::to_string_pretty(&shown)?,
                OutputFormat::Table | OutputFormat::Plain => {
                    toml::to_string_pretty(&shown).map_err(|e| CliError::Validation {
                        field: "config".into(),
                        reason: format!("failed to serialize config: {e}"),
                    })?
                }
            };
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }
    }
}
