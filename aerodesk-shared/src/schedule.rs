//! Timestamp parsing and rendering shared by routes, reservations and payments.

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};

/// Layout used on the wire, e.g. `March 30, 2025 - 16:46:19`.
pub const DISPLAY_FORMAT: &str = "%B %d, %Y - %H:%M:%S";

const SPANISH_MONTHS: [(&str, &str); 12] = [
    ("enero", "January"),
    ("febrero", "February"),
    ("marzo", "March"),
    ("abril", "April"),
    ("mayo", "May"),
    ("junio", "June"),
    ("julio", "July"),
    ("agosto", "August"),
    ("septiembre", "September"),
    ("octubre", "October"),
    ("noviembre", "November"),
    ("diciembre", "December"),
];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unrecognised timestamp '{0}', expected e.g. 'March 30, 2025 - 16:46:19'")]
pub struct ScheduleError(pub String);

/// Parses the display layout (English or Spanish month), RFC 3339, or
/// `YYYY-MM-DD HH:MM:SS`.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, ScheduleError> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }

    NaiveDateTime::parse_from_str(&english_month(trimmed), DISPLAY_FORMAT)
        .map_err(|_| ScheduleError(raw.to_string()))
}

pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(DISPLAY_FORMAT).to_string()
}

/// Current UTC time truncated to whole seconds, so it survives a trip through
/// [`DISPLAY_FORMAT`] unchanged.
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(0)
}

/// Human readable duration between two instants, e.g. `2 hours 39 minutes`.
pub fn flight_time(departure: &NaiveDateTime, arrival: &NaiveDateTime) -> String {
    let minutes = (*arrival - *departure).num_minutes().max(0);
    format!("{} hours {} minutes", minutes / 60, minutes % 60)
}

fn english_month(raw: &str) -> String {
    let Some((month, rest)) = raw.split_once(' ') else {
        return raw.to_string();
    };
    let lowered = month.to_lowercase();
    SPANISH_MONTHS
        .iter()
        .find(|(spanish, _)| *spanish == lowered)
        .map(|(_, english)| format!("{} {}", english, rest))
        .unwrap_or_else(|| raw.to_string())
}

/// `#[serde(with = "schedule::wire")]` for `NaiveDateTime` fields.
pub mod wire {
    use super::{format_timestamp, parse_timestamp};
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_timestamp(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw).map_err(de::Error::custom)
    }
}
