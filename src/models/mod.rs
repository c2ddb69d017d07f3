//! Row models for the dashboard's denormalized tables.
//!
//! Attribute names follow the upstream warehouse schema (`AorShortName`,
//! `OfficeCode`, `TrainingTopicId`, ...) so rows deserialize directly from
//! the server's bulk payload and round-trip through the cache unchanged.
//!
//! Identifier columns arrive as either JSON strings or numbers depending on
//! which view produced them; they are normalized to `String` on the way in
//! so selection matching is a plain string comparison everywhere.

pub mod class;
pub mod dimensions;
pub mod stats;

pub use class::{parse_start_time, Class};
pub use dimensions::{Aor, Instructor, Location, Office, Topic};
pub use stats::{ActiveMember, AttendanceStat, RequestStat};

use serde::{Deserialize, Deserializer};

/// Deserialize an identifier that may be a JSON string or number into a `String`.
pub(crate) fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number identifier, got {}",
            other
        ))),
    }
}

/// Optional variant of [`id_string`]: `null` and absent both map to `None`.
pub(crate) fn opt_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number identifier, got {}",
            other
        ))),
    }
}
