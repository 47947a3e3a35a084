//! List handlers for zones, devices, and zone roles.

use serde::Serialize;
use tabled::Tabled;

use ramses_names_core::{DeviceRole, EntityKind, NamedEntity};

use crate::cli::{GlobalOpts, ListArgs, ListCommand};
use crate::error::CliError;
use crate::output;

use super::Resolver;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct EntityRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "First seen")]
    first_seen: String,
    #[tabled(rename = "Last seen")]
    last_seen: String,
}

impl From<&NamedEntity> for EntityRow {
    fn from(e: &NamedEntity) -> Self {
        Self {
            key: e.key().to_owned(),
            name: e.name().to_owned(),
            first_seen: e.first_seen().format("%Y-%m-%d %H:%M:%S").to_string(),
            last_seen: e.last_seen().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// One zone → role → device link.
#[derive(Debug, Serialize, Tabled)]
struct RoleLink {
    #[tabled(rename = "Zone")]
    zone_index: String,
    #[tabled(rename = "Role")]
    role: DeviceRole,
    #[tabled(rename = "Device")]
    device_id: String,
}

impl RoleLink {
    fn row(&self) -> Self {
        Self {
            zone_index: self.zone_index.clone(),
            role: self.role,
            device_id: self.device_id.clone(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(resolver: &Resolver, args: &ListArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let snapshot = resolver.snapshot();

    let rendered = match args.command {
        ListCommand::Zones => list_entities(global, snapshot.entities(EntityKind::Zone).values())?,
        ListCommand::Devices => {
            list_entities(global, snapshot.entities(EntityKind::Device).values())?
        }
        ListCommand::Roles => {
            let links: Vec<RoleLink> = snapshot
                .zone_roles()
                .iter()
                .flat_map(|(zone, roles)| {
                    roles.iter().flat_map(move |(role, devices)| {
                        devices.iter().map(move |device| RoleLink {
                            zone_index: zone.clone(),
                            role: *role,
                            device_id: device.clone(),
                        })
                    })
                })
                .collect();

            output::render_list(global.output, &links, RoleLink::row, |l| {
                format!("{}\t{}\t{}", l.zone_index, l.role, l.device_id)
            })?
        }
    };

    output::print_output(&rendered, global.quiet);
    Ok(())
}

fn list_entities<'a>(
    global: &GlobalOpts,
    entities: impl Iterator<Item = &'a NamedEntity>,
) -> Result<String, CliError> {
    let entities: Vec<&NamedEntity> = entities.collect();
    output::render_list(
        global.output,
        &entities,
        |e| EntityRow::from(*e),
        |e| e.key().to_owned(),
    )
}
