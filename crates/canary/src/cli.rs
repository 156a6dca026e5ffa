//! Clap derive structures for the `canary` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use canary_core::SensorType;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// canary -- read Canary home-security sensors from the command line
#[derive(Debug, Parser)]
#[command(
    name = "canary",
    version,
    about = "Read Canary home-security sensors from the command line",
    long_about = "Logs in to the Canary cloud, resolves a unit by its serial number,\n\
        and reports its temperature, humidity, air quality, or battery level.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config dir)
    #[arg(long, env = "CANARY_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Accessory name from the config file
    #[arg(long, short = 'a', env = "CANARY_ACCESSORY", global = true)]
    pub accessory: Option<String>,

    /// Device serial number (overrides --accessory)
    #[arg(long, short = 's', env = "CANARY_SERIAL", global = true)]
    pub serial: Option<String>,

    /// Hardware model of --serial
    #[arg(long, short = 'm', env = "CANARY_MODEL", default_value = "AllInOne", global = true)]
    pub model: String,

    /// Account e-mail
    #[arg(long, short = 'u', env = "CANARY_USERNAME", global = true)]
    pub username: Option<String>,

    /// Account password
    #[arg(long, env = "CANARY_PASSWORD", global = true, hide_env = true)]
    pub password: Option<String>,

    /// Vendor API origin
    #[arg(long, env = "CANARY_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "CANARY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(long, short = 'o', env = "CANARY_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every device on the account
    #[command(alias = "dev", alias = "d")]
    Devices,

    /// Read the configured device's sensors
    #[command(alias = "r")]
    Read(ReadArgs),

    /// Poll the configured device and print each new reading set
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Inspect configuration
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct ReadArgs {
    /// One sensor (temperature, humidity, battery, air_quality); all if omitted
    pub sensor: Option<SensorType>,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between polls
    #[arg(long, short = 'i', default_value = "300")]
    pub interval: u64,

    /// Stop after this many snapshots
    #[arg(long, short = 'n')]
    pub count: Option<u64>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,
    /// Show the effective configuration (password redacted)
    Show,
}
