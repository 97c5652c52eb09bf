//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Sheet Notifier - push spreadsheet changes to chat groups
#[derive(Parser, Debug)]
#[command(
    name = "sheet-notifier",
    author,
    version,
    about = "Spreadsheet change notifier",
    long_about = "Turns form submissions and cell edits into chat notifications.\n\n\
                  Each trigger payload is normalized, interpreted against the rules \n\
                  stored in the workbook, and broadcast to every configured subscriber."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "SHEET_NOTIFIER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "SHEET_NOTIFIER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process a single trigger payload
    Handle(HandleArgs),

    /// Process newline-delimited trigger payloads
    Run(RunArgs),

    /// Validate configuration file without processing anything
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `handle` command
#[derive(Parser, Debug, Clone)]
pub struct HandleArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "config.toml",
        env = "SHEET_NOTIFIER_CONFIG"
    )]
    pub config: PathBuf,

    /// Trigger payload file ("-" for stdin)
    #[arg(short, long, default_value = "-")]
    pub event: PathBuf,

    /// Output the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "config.toml",
        env = "SHEET_NOTIFIER_CONFIG"
    )]
    pub config: PathBuf,

    /// Newline-delimited JSON payloads ("-" for stdin)
    #[arg(short, long, default_value = "-")]
    pub input: PathBuf,

    /// Maximum number of payloads processed concurrently
    #[arg(long, default_value = "16", env = "SHEET_NOTIFIER_MAX_IN_FLIGHT")]
    pub max_in_flight: usize,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "SHEET_NOTIFIER_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
