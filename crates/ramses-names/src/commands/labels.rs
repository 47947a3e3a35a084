//! Labels handler.

use ramses_names_core::Labels;

use crate::cli::{GlobalOpts, LabelsArgs};
use crate::error::CliError;
use crate::output;

use super::Resolver;

fn detail(l: &Labels) -> String {
    format!("Device name: {}\nZone name:   {}", l.device_name, l.zone_name)
}

pub fn handle(resolver: &Resolver, args: &LabelsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    if args.device.is_none() && args.zone.is_none() {
        return Err(CliError::Validation {
            field: "labels".into(),
            reason: "pass --device, --zone, or both".into(),
        });
    }

    let labels = resolver
        .labels()
        .labels_for(args.device.as_deref(), args.zone.as_deref());

    let rendered = output::render_single(global.output, &labels, detail, |l| {
        format!("{}\t{}", l.device_name, l.zone_name)
    })?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}
