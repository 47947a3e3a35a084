//! Command dispatch: bridges CLI args -> resolver calls -> output formatting.

pub mod config_cmd;
pub mod ingest;
pub mod labels;
pub mod list;
pub mod resolve;

use ramses_names_core::{JsonFileStore, NameResolver};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

pub type Resolver = NameResolver<JsonFileStore>;

/// Dispatch a cache-bound command to the appropriate handler.
pub fn dispatch(cmd: Command, resolver: &Resolver, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Ingest(args) => ingest::handle(resolver, &args, global),
        Command::Resolve(args) => resolve::handle(resolver, &args, global),
        Command::Labels(args) => labels::handle(resolver, &args, global),
        Command::List(args) => list::handle(resolver, &args, global),
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
