//! Clap derive structures for the `ramses-names` CLI.
//!
//! Kept free of crate-internal types so `build.rs` can include it for man
//! page generation.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// ramses-names -- zone and device names for RAMSES RF metrics
#[derive(Debug, Parser)]
#[command(
    name = "ramses-names",
    version,
    about = "Maintain the RAMSES RF zone and device name cache",
    long_about = "Feed name and role observations into the persistent cache that\n\
        turns RAMSES RF zone indexes and device addresses into the\n\
        zone_name and device_name labels of exported heating metrics.",
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
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Name cache file (overrides config)
    #[arg(long, global = true, value_name = "PATH")]
    pub cache_file: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Log line format on stderr (overrides config)
    #[arg(long, global = true)]
    pub log_format: Option<LogFormatArg>,
}

// ── Shared Enums ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    /// Human-readable lines
    Text,
    /// One JSON object per event
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EntityKindArg {
    /// Zone, keyed by zone index (e.g. "02")
    Zone,
    /// Device, keyed by device address (e.g. "04:122498")
    Device,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply JSON-line observations from a file or stdin
    Ingest(IngestArgs),

    /// Resolve a zone index or device address to its name
    #[command(alias = "r")]
    Resolve(ResolveArgs),

    /// Show the metric labels for a device and/or zone
    Labels(LabelsArgs),

    /// List cached zones, devices, or zone roles
    #[command(alias = "ls")]
    List(ListArgs),

    /// Inspect configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Ingest ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct IngestArgs {
    /// File of newline-delimited observations ("-" or omitted for stdin)
    pub file: Option<PathBuf>,
}

// ── Resolve ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// What kind of key to resolve
    pub kind: EntityKindArg,

    /// Zone index or device address
    pub key: String,
}

// ── Labels ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LabelsArgs {
    /// Device address the measurement came from
    #[arg(long, short = 'd')]
    pub device: Option<String>,

    /// Zone index the measurement is about (wins over the device's zone)
    #[arg(long, short = 'z')]
    pub zone: Option<String>,
}

// ── List ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(subcommand)]
    pub command: ListCommand,
}

#[derive(Debug, Subcommand)]
pub enum ListCommand {
    /// Named zones
    Zones,
    /// Named devices
    Devices,
    /// Zone → role → device links
    Roles,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Display the effective configuration
    Show,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
