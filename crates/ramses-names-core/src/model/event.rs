// ── Observation events ──
//
// Typed events produced by the ingestion adapter from decoded frames.
// On the wire they are JSON objects tagged by `type`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::epoch::epoch_seconds;
use super::role::DeviceRole;
use super::snapshot::Outcome;

/// One fact learned from radio traffic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Observation {
    /// A zone-name message (code 0004).
    ZoneNameObserved {
        zone_index: String,
        name: String,
        #[serde(with = "epoch_seconds")]
        ts: DateTime<Utc>,
    },
    /// A device alias reported by the gateway.
    DeviceNameObserved {
        device_id: String,
        name: String,
        #[serde(with = "epoch_seconds")]
        ts: DateTime<Utc>,
    },
    /// One device from a zone-devices message (code 000C).
    ZoneDeviceRoleObserved {
        zone_index: String,
        role: DeviceRole,
        device_id: String,
        #[serde(with = "epoch_seconds")]
        ts: DateTime<Utc>,
    },
}

impl Observation {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::ZoneNameObserved { ts, .. }
            | Self::DeviceNameObserved { ts, .. }
            | Self::ZoneDeviceRoleObserved { ts, .. } => *ts,
        }
    }
}

/// What applying an [`Observation`] did to the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Name(Outcome),
    Role { changed: bool },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_tagged_json_lines() {
        let line = r#"{"type":"zone_device_role_observed","zone_index":"02","role":"zone_sensor","device_id":"04:122498","ts":1700000000}"#;
        let obs: Observation = serde_json::from_str(line).unwrap();

        assert_eq!(
            obs,
            Observation::ZoneDeviceRoleObserved {
                zone_index: "02".into(),
                role: DeviceRole::ZoneSensor,
                device_id: "04:122498".into(),
                ts: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            }
        );
    }

    #[test]
    fn unknown_role_is_a_parse_error() {
        let line = r#"{"type":"zone_device_role_observed","zone_index":"02","role":"boiler","device_id":"10:000001","ts":1}"#;
        assert!(serde_json::from_str::<Observation>(line).is_err());
    }

    #[test]
    fn fractional_timestamps_parse() {
        let line = r#"{"type":"zone_name_observed","zone_index":"01","name":"Lounge","ts":1700000000.5}"#;
        let obs: Observation = serde_json::from_str(line).unwrap();
        assert_eq!(obs.timestamp().timestamp_subsec_millis(), 500);
    }
}
