//! Resolve handler.

use serde::Serialize;

use ramses_names_core::EntityKind;

use crate::cli::{EntityKindArg, GlobalOpts, ResolveArgs};
use crate::error::CliError;
use crate::output;

use super::Resolver;

#[derive(Debug, Serialize)]
struct Resolved {
    kind: EntityKind,
    key: String,
    name: String,
}

impl From<EntityKindArg> for EntityKind {
    fn from(arg: EntityKindArg) -> Self {
        match arg {
            EntityKindArg::Zone => Self::Zone,
            EntityKindArg::Device => Self::Device,
        }
    }
}

pub fn handle(
    resolver: &Resolver,
    args: &ResolveArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let kind = EntityKind::from(args.kind);
    let resolved = Resolved {
        kind,
        name: resolver.resolve(kind, &args.key),
        key: args.key.clone(),
    };

    let rendered = output::render_single(
        global.output,
        &resolved,
        |r| r.name.clone(),
        |r| r.name.clone(),
    )?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}
