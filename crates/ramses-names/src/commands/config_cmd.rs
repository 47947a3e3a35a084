//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

pub fn handle(
    args: &ConfigArgs,
    settings: Result<Config, CliError>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        // Works even when the file is missing or broken.
        ConfigCommand::Path => {
            output::print_output(&config::config_file(global).display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = settings?;
            let toml = config::to_toml(&cfg)?;
            let rendered = output::render_single(
                global.output,
                &cfg,
                |_| toml.trim_end().to_owned(),
                |c| c.cache_file.display().to_string(),
            )?;
            output::print_output(&rendered, global.quiet);
            Ok(())
        }
    }
}
