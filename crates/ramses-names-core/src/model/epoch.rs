// ── Epoch-seconds timestamps ──
//
// The cache document and observation events carry timestamps as JSON
// numbers of seconds since the Unix epoch, with a fractional part down to
// microseconds. Whole-second integers are accepted on input.

use chrono::{DateTime, Utc};

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub(crate) fn to_epoch_seconds(at: DateTime<Utc>) -> f64 {
    at.timestamp_micros() as f64 / 1_000_000.0
}

#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
pub(crate) fn from_epoch_seconds(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let micros = (secs * 1_000_000.0).round();
    if micros.abs() >= 9.0e18 {
        return None;
    }
    DateTime::from_timestamp_micros(micros as i64)
}

/// `#[serde(with = "...")]` adapter for a `DateTime<Utc>` field.
pub(crate) mod epoch_seconds {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub(crate) fn serialize<S: Serializer>(
        at: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(super::to_epoch_seconds(*at))
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        super::from_epoch_seconds(secs)
            .ok_or_else(|| de::Error::custom(format!("timestamp {secs} is out of range")))
    }
}
