//! Label-ready dropdown option lists for the host UI.
//!
//! Every list gets a synthesized leading "All ..." entry carrying the
//! sentinel value, so the UI can render "no filter" without special cases.

use std::collections::HashMap;

use crate::models::{Aor, Class, Instructor, Location, Office, Topic};

use super::ALL_SENTINEL;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
    pub disabled: bool,
}

impl DropdownOption {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            disabled: false,
        }
    }
}

/// Visibility and placeholder for one dropdown's loading indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinnerState {
    pub visible: bool,
    pub placeholder: &'static str,
}

/// Spinner shown (and a loading placeholder) until the data is ready.
pub fn spinner_state(ready: bool) -> SpinnerState {
    SpinnerState {
        visible: !ready,
        placeholder: if ready { "Select..." } else { "Loading..." },
    }
}

fn with_all(plural: &str, rest: impl IntoIterator<Item = DropdownOption>) -> Vec<DropdownOption> {
    let mut options = vec![DropdownOption::new(format!("All {}", plural), ALL_SENTINEL)];
    options.extend(rest);
    options
}

pub fn aor_options(aors: &[Aor]) -> Vec<DropdownOption> {
    with_all(
        "AORs",
        aors.iter().map(|a| {
            let label = if a.full_name.is_empty() {
                a.short_name.clone()
            } else {
                format!("{} - {}", a.short_name, a.full_name)
            };
            DropdownOption::new(label, &a.short_name)
        }),
    )
}

pub fn office_options(offices: &[Office]) -> Vec<DropdownOption> {
    with_all(
        "Offices",
        offices
            .iter()
            .map(|o| DropdownOption::new(&o.office_code, &o.office_code)),
    )
}

pub fn topic_options(topics: &[Topic]) -> Vec<DropdownOption> {
    with_all(
        "Topics",
        topics.iter().map(|t| DropdownOption::new(&t.name, &t.topic_id)),
    )
}

pub fn instructor_options(instructors: &[Instructor]) -> Vec<DropdownOption> {
    with_all(
        "Instructors",
        instructors
            .iter()
            .map(|i| DropdownOption::new(&i.name, &i.instructor_id)),
    )
}

pub fn location_options(locations: &[Location]) -> Vec<DropdownOption> {
    with_all(
        "Locations",
        locations
            .iter()
            .map(|l| DropdownOption::new(&l.name, &l.location_id)),
    )
}

/// Class labels include the topic name (looked up from the full topic
/// table) and the raw start time, e.g. `"Safety: Safety 101 (Feb-04-25@6 PM)"`.
pub fn class_options(classes: &[Class], topics: &[Topic]) -> Vec<DropdownOption> {
    let names: HashMap<&str, &str> = topics
        .iter()
        .map(|t| (t.topic_id.as_str(), t.name.as_str()))
        .collect();
    with_all(
        "Classes",
        classes.iter().map(|c| {
            let mut label = match names.get(c.topic_id.as_str()) {
                Some(topic) => format!("{}: {}", topic, c.name),
                None => c.name.clone(),
            };
            if !c.start_time.is_empty() {
                label.push_str(&format!(" ({})", c.start_time));
            }
            DropdownOption::new(label, &c.class_id)
        }),
    )
}
