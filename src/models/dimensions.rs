//! Dimension tables: the reference entities the cascading filters select over.

use serde::{Deserialize, Serialize};

use super::id_string;

/// Area of Responsibility, the top-level organizational grouping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Aor {
    #[serde(rename = "AorShortName")]
    pub short_name: String,
    #[serde(rename = "AorName", default)]
    pub full_name: String,
}

/// An office belongs to exactly one AOR; offices are how members attach
/// to the org tree, so several derivations pivot through this table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Office {
    #[serde(rename = "OfficeCode")]
    pub office_code: String,
    #[serde(rename = "AorShortName")]
    pub aor_short_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Topic {
    #[serde(rename = "TopicId", deserialize_with = "id_string")]
    pub topic_id: String,
    #[serde(rename = "TopicName")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Instructor {
    #[serde(rename = "InstructorID", alias = "InstructorId", deserialize_with = "id_string")]
    pub instructor_id: String,
    #[serde(rename = "Name")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    #[serde(rename = "LocationID", alias = "LocationId", deserialize_with = "id_string")]
    pub location_id: String,
    #[serde(rename = "Name")]
    pub name: String,
}
