mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ramses_names_config::{LogConfig, LogFormat};
use ramses_names_core::{JsonFileStore, NameResolver};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

fn main() {
    let cli = Cli::parse();

    // Tracing needs the log settings, but a broken config should still
    // surface as a diagnostic rather than a silent default.
    let settings = config::load(&cli.global);
    let fallback = LogConfig::default();
    let log = settings.as_ref().map_or(&fallback, |cfg| &cfg.log);
    init_tracing(&cli.global, log);

    if let Err(err) = run(cli, settings) {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(global: &GlobalOpts, log: &LogConfig) {
    let level = match (global.quiet, global.verbose) {
        (true, _) => "error",
        (false, 0) => log.level.as_str(),
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr);

    match log.format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn run(cli: Cli, settings: Result<config::Config, CliError>) -> Result<(), CliError> {
    match cli.command {
        Command::Config(args) => commands::config_cmd::handle(&args, settings, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "ramses-names", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let cfg = settings?;
            let resolver = NameResolver::open(JsonFileStore::new(&cfg.cache_file));

            tracing::debug!(
                command = ?cmd,
                cache_file = %cfg.cache_file.display(),
                "dispatching command"
            );
            commands::dispatch(cmd, &resolver, &cli.global)
        }
    }
}
