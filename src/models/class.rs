//! Class rows and the dashboard's custom start-time format.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::id_string;

/// A scheduled training class. Carries foreign keys into every dimension
/// except Office; office membership is only derivable transitively through
/// attendance records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Class {
    #[serde(rename = "ClassId", deserialize_with = "id_string")]
    pub class_id: String,
    #[serde(rename = "ClassName")]
    pub name: String,
    /// Custom warehouse format, e.g. `"Feb-04-25@6 PM"`.
    #[serde(rename = "StartTime", default)]
    pub start_time: String,
    #[serde(rename = "AorShortName")]
    pub aor_short_name: String,
    #[serde(rename = "TopicId", deserialize_with = "id_string")]
    pub topic_id: String,
    #[serde(rename = "InstructorId", deserialize_with = "id_string")]
    pub instructor_id: String,
    #[serde(rename = "LocationId", deserialize_with = "id_string")]
    pub location_id: String,
}

impl Class {
    /// Parsed start time, `None` when the raw value is malformed or empty.
    pub fn start(&self) -> Option<NaiveDateTime> {
        parse_start_time(&self.start_time)
    }

    /// Date component of the start time, used by date-range filtering.
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start().map(|dt| dt.date())
    }
}

/// Parse the warehouse's `"Mon-DD-YY@H AM/PM"` start-time format,
/// e.g. `"Feb-04-25@6 PM"` or `"Dec-31-24@12 AM"`.
///
/// The hour carries no minutes; midnight is `12 AM` and noon `12 PM`.
/// Anything that does not match returns `None` and the caller drops the row.
pub fn parse_start_time(raw: &str) -> Option<NaiveDateTime> {
    let (date_part, time_part) = raw.trim().split_once('@')?;
    let date = NaiveDate::parse_from_str(date_part.trim(), "%b-%d-%y").ok()?;

    let (hour_part, meridiem) = time_part.trim().split_once(' ')?;
    let hour12: u32 = hour_part.trim().parse().ok()?;
    if !(1..=12).contains(&hour12) {
        return None;
    }
    let hour = match meridiem.trim() {
        "AM" => hour12 % 12,
        "PM" => hour12 % 12 + 12,
        _ => return None,
    };
    date.and_hms_opt(hour, 0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_evening_start_time() {
        let dt = parse_start_time("Feb-04-25@6 PM").unwrap();
        assert_eq!(dt, NaiveDate::from_ymd_opt(2025, 2, 4).unwrap().and_hms_opt(18, 0, 0).unwrap());
    }

    #[test]
    fn parses_twelve_hour_edges() {
        let midnight = parse_start_time("Dec-31-24@12 AM").unwrap();
        assert_eq!(midnight.time(), chrono::NaiveTime::from_hms_opt(0, 0, 0).unwrap());

        let noon = parse_start_time("Dec-31-24@12 PM").unwrap();
        assert_eq!(noon.time(), chrono::NaiveTime::from_hms_opt(12, 0, 0).unwrap());
    }

    #[test]
    fn rejects_malformed_start_times() {
        assert!(parse_start_time("").is_none());
        assert!(parse_start_time("Feb-04-25").is_none());
        assert!(parse_start_time("Feb-04-25@13 PM").is_none());
        assert!(parse_start_time("Feb-04-25@6 XM").is_none());
        assert!(parse_start_time("2025-02-04 18:00").is_none());
    }
}
