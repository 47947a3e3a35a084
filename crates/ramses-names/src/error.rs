//! CLI error types with miette diagnostics.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use ramses_names_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const IO: i32 = 4;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(ramses_names::no_config),
        help("Drop --config to use the default location, or run: ramses-names config path")
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(
        code(ramses_names::config),
        help("Check the config file and RAMSES_NAMES_* environment variables.")
    )]
    Config(#[from] ConfigError),

    // ── Input ────────────────────────────────────────────────────────
    #[error("Could not read observations from {path}")]
    #[diagnostic(
        code(ramses_names::input),
        help("Pass a readable file, or '-' to read from stdin.")
    )]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(ramses_names::validation))]
    Validation { field: String, reason: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(ramses_names::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(ramses_names::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoConfig { .. } | Self::Config(_) => exit_code::CONFIG,
            Self::Input { .. } | Self::Io(_) => exit_code::IO,
            Self::Validation { .. } => exit_code::USAGE,
            Self::Json(_) | Self::Yaml(_) => exit_code::GENERAL,
        }
    }
}
