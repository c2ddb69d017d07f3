//! Fact tables and the active-member roster.
//!
//! Stat rows are aggregates joining dimensions with counters. Different
//! warehouse views project different column subsets, so every field is
//! optional; filters only apply to a row when it carries the field.

use serde::{Deserialize, Serialize};

use super::opt_id_string;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttendanceStat {
    #[serde(rename = "TrainingClassId", deserialize_with = "opt_id_string", default)]
    pub class_id: Option<String>,
    #[serde(rename = "TrainingTopicId", deserialize_with = "opt_id_string", default)]
    pub topic_id: Option<String>,
    #[serde(rename = "InstructorId", deserialize_with = "opt_id_string", default)]
    pub instructor_id: Option<String>,
    #[serde(rename = "LocationId", deserialize_with = "opt_id_string", default)]
    pub location_id: Option<String>,
    #[serde(rename = "AorShortName", default)]
    pub aor_short_name: Option<String>,
    #[serde(rename = "MemberOffice", default)]
    pub member_office: Option<String>,
    /// Same custom format as the class start time.
    #[serde(rename = "StartTime", default)]
    pub start_time: Option<String>,
    #[serde(rename = "TotalAttendances", default)]
    pub total_attendances: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestStat {
    #[serde(rename = "TrainingTopicId", deserialize_with = "opt_id_string", default)]
    pub topic_id: Option<String>,
    #[serde(rename = "AorShortName", default)]
    pub aor_short_name: Option<String>,
    #[serde(rename = "MemberOffice", default)]
    pub member_office: Option<String>,
    #[serde(rename = "StartTime", default)]
    pub start_time: Option<String>,
    #[serde(rename = "TotalRequests", default)]
    pub total_requests: Option<i64>,
}

/// One row per active member; the summary cards count these distinct by id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActiveMember {
    #[serde(rename = "MemberId", deserialize_with = "super::id_string")]
    pub member_id: String,
    #[serde(rename = "OfficeCode")]
    pub office_code: String,
}
