//! Wall-clock timestamps stored on books and borrow records.
//!
//! Persisted as `YYYY-MM-DD HH:MM:SS` local time. Values are truncated to
//! whole seconds on creation so a save/load cycle reproduces them exactly.

use chrono::{Local, NaiveDateTime, SubsecRound};

/// Text layout used in the catalog file.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time at second precision.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

/// Renders `value` with [`TIMESTAMP_FORMAT`].
pub fn format(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Serde adapter for `#[serde(with = "...")]` fields.
pub(crate) mod serde_format {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).map_err(|err| {
            serde::de::Error::custom(format!("invalid timestamp `{raw}`: {err}"))
        })
    }
}
