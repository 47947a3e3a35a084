// ── Device roles within a zone ──

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// The function a device performs within a zone, as reported by the
/// controller's zone-devices message.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeviceRole {
    ZoneActuator,
    ZoneSensor,
    RadActuator,
    ApplianceControl,
    HotwaterValve,
    DhwSensor,
    HeatingValve,
}
