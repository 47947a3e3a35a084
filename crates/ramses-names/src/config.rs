//! CLI configuration: thin wrapper around `ramses_names_config`.
//!
//! Adds `GlobalOpts`-aware resolution: `--config` selects the file,
//! `--cache-file` and `--log-format` override what it says.

use std::path::PathBuf;

use ramses_names_config::LogFormat;

use crate::cli::{GlobalOpts, LogFormatArg};
use crate::error::CliError;

pub use ramses_names_config::{Config, config_path, load_config_from, to_toml};

/// Config file in effect: `--config` if given, else the platform path.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(config_path)
}

/// Load the effective config with command-line overrides applied.
///
/// An explicit `--config` must exist; the platform default may be absent.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let path = config_file(global);
    if global.config.is_some() && !path.is_file() {
        return Err(CliError::NoConfig {
            path: path.display().to_string(),
        });
    }

    let mut cfg = load_config_from(&path)?;
    if let Some(cache_file) = &global.cache_file {
        cfg.cache_file.clone_from(cache_file);
    }
    if let Some(format) = global.log_format {
        cfg.log.format = match format {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        };
    }
    Ok(cfg)
}
