//! Summary-card aggregation.
//!
//! Operates on the differently-shaped stat tables rather than the dimension
//! tables, with its own fixed predicate order: AOR, then date range, then
//! topic, instructor, location. A predicate only applies when its selection
//! is active, and only to rows that carry the field. Nothing here can fail
//! upward; the worst case is the zero-valued metric tuple.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::debug;

use crate::filter::Selection;
use crate::models::{parse_start_time, ActiveMember, AttendanceStat, Class, Office, RequestStat};

/// Inclusive date window from the UI's range picker. Both bounds are
/// required; without both, the date filter is inactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Parse ISO `YYYY-MM-DD` bounds. Returns `None` unless both parse.
    pub fn parse(from: &str, to: &str) -> Option<Self> {
        let from = NaiveDate::parse_from_str(from.trim(), "%Y-%m-%d").ok()?;
        let to = NaiveDate::parse_from_str(to.trim(), "%Y-%m-%d").ok()?;
        Some(Self { from, to })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Apply the range to a raw start-time field. Absent fields pass;
    /// present-but-unparsable timestamps drop the row.
    fn permits_raw(&self, raw: Option<&str>) -> bool {
        match raw {
            None => true,
            Some(raw) => match parse_start_time(raw) {
                Some(dt) => self.contains(dt.date()),
                None => false,
            },
        }
    }
}

/// Classes surviving the summary-card filters, in predicate order.
pub fn filter_classes(
    classes: &[Class],
    aors: &Selection,
    range: Option<&DateRange>,
    topics: &Selection,
    instructors: &Selection,
    locations: &Selection,
) -> Vec<Class> {
    classes
        .iter()
        .filter(|c| aors.permits(&c.aor_short_name))
        .filter(|c| match range {
            Some(range) => range.permits_raw(if c.start_time.is_empty() {
                None
            } else {
                Some(c.start_time.as_str())
            }),
            None => true,
        })
        .filter(|c| topics.permits(&c.topic_id))
        .filter(|c| instructors.permits(&c.instructor_id))
        .filter(|c| locations.permits(&c.location_id))
        .cloned()
        .collect()
}

pub fn filter_attendance(
    rows: &[AttendanceStat],
    aors: &Selection,
    range: Option<&DateRange>,
    topics: &Selection,
    instructors: &Selection,
    locations: &Selection,
) -> Vec<AttendanceStat> {
    rows.iter()
        .filter(|r| aors.permits_opt(r.aor_short_name.as_deref()))
        .filter(|r| match range {
            Some(range) => range.permits_raw(r.start_time.as_deref()),
            None => true,
        })
        .filter(|r| topics.permits_opt(r.topic_id.as_deref()))
        .filter(|r| instructors.permits_opt(r.instructor_id.as_deref()))
        .filter(|r| locations.permits_opt(r.location_id.as_deref()))
        .cloned()
        .collect()
}

pub fn filter_requests(
    rows: &[RequestStat],
    aors: &Selection,
    range: Option<&DateRange>,
    topics: &Selection,
) -> Vec<RequestStat> {
    rows.iter()
        .filter(|r| aors.permits_opt(r.aor_short_name.as_deref()))
        .filter(|r| match range {
            Some(range) => range.permits_raw(r.start_time.as_deref()),
            None => true,
        })
        .filter(|r| topics.permits_opt(r.topic_id.as_deref()))
        .cloned()
        .collect()
}

/// Active members narrowed by office. An explicit office selection wins;
/// otherwise an AOR selection resolves to its member offices through the
/// Office dimension; otherwise nobody is filtered out.
pub fn filter_members(
    members: &[ActiveMember],
    offices: &Selection,
    aors: &Selection,
    office_dim: &[Office],
) -> Vec<ActiveMember> {
    if offices.is_active() {
        return members
            .iter()
            .filter(|m| offices.contains(&m.office_code))
            .cloned()
            .collect();
    }
    if aors.is_active() {
        let derived: HashSet<&str> = office_dim
            .iter()
            .filter(|o| aors.contains(&o.aor_short_name))
            .map(|o| o.office_code.as_str())
            .collect();
        return members
            .iter()
            .filter(|m| derived.contains(m.office_code.as_str()))
            .cloned()
            .collect();
    }
    members.to_vec()
}

/// The four summary-card values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSummary {
    pub total_classes: u64,
    pub total_attendances: u64,
    pub total_requests: u64,
    pub active_members: u64,
}

impl MetricsSummary {
    pub fn zero() -> Self {
        Self::default()
    }

    /// The 4-tuple of card strings, thousands-separated.
    pub fn formatted(&self) -> [String; 4] {
        [
            format_count(self.total_classes),
            format_count(self.total_attendances),
            format_count(self.total_requests),
            format_count(self.active_members),
        ]
    }
}

/// Reduce already-filtered rows to the summary-card values.
///
/// The attendance and request totals sum their counter columns; a table
/// whose rows carry no counter at all falls back to the row count. Active
/// members are counted distinct by member id.
pub fn summarize(
    classes: &[Class],
    attendance: &[AttendanceStat],
    requests: &[RequestStat],
    members: &[ActiveMember],
) -> MetricsSummary {
    let total_attendances = sum_or_count(attendance, |r| r.total_attendances);
    let total_requests = sum_or_count(requests, |r| r.total_requests);
    let distinct_members: HashSet<&str> = members.iter().map(|m| m.member_id.as_str()).collect();

    let summary = MetricsSummary {
        total_classes: classes.len() as u64,
        total_attendances,
        total_requests,
        active_members: distinct_members.len() as u64,
    };
    debug!(?summary, "Computed summary metrics");
    summary
}

fn sum_or_count<T>(rows: &[T], counter: impl Fn(&T) -> Option<i64>) -> u64 {
    if rows.iter().any(|r| counter(r).is_some()) {
        rows.iter()
            .filter_map(&counter)
            .map(|n| n.max(0) as u64)
            .sum()
    } else {
        rows.len() as u64
    }
}

fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn classes() -> Vec<Class> {
        serde_json::from_value(json!([
            {"ClassId": 100, "ClassName": "Safety 101", "StartTime": "Feb-04-25@6 PM",
             "AorShortName": "EAST", "TopicId": 7, "InstructorId": 1, "LocationId": 5},
            {"ClassId": 200, "ClassName": "Bad Clock", "StartTime": "not a time",
             "AorShortName": "EAST", "TopicId": 7, "InstructorId": 1, "LocationId": 5}
        ]))
        .unwrap()
    }

    #[test]
    fn date_range_keeps_rows_inside_the_window() {
        let classes = classes();
        let none = Selection::default();

        let range = DateRange::parse("2025-02-01", "2025-02-28").unwrap();
        let kept = filter_classes(&classes, &none, Some(&range), &none, &none, &none);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].class_id, "100");

        let range = DateRange::parse("2025-01-01", "2025-01-31").unwrap();
        let kept = filter_classes(&classes, &none, Some(&range), &none, &none, &none);
        assert!(kept.is_empty());
    }

    #[test]
    fn unparsable_timestamps_drop_only_under_an_active_range() {
        let classes = classes();
        let none = Selection::default();

        // No range: the malformed row sails through.
        let kept = filter_classes(&classes, &none, None, &none, &none, &none);
        assert_eq!(kept.len(), 2);

        // Active range: the malformed row is dropped, not errored.
        let range = DateRange::parse("2025-01-01", "2025-12-31").unwrap();
        let kept = filter_classes(&classes, &none, Some(&range), &none, &none, &none);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn date_range_requires_both_bounds() {
        assert!(DateRange::parse("2025-02-01", "").is_none());
        assert!(DateRange::parse("", "2025-02-28").is_none());
        assert!(DateRange::parse("2025-02-01", "2025-02-28").is_some());
    }

    #[test]
    fn attendance_sum_uses_counter_when_present() {
        let rows: Vec<AttendanceStat> = serde_json::from_value(json!([
            {"TrainingClassId": 1, "TotalAttendances": 5},
            {"TrainingClassId": 2, "TotalAttendances": 3},
            {"TrainingClassId": 3}
        ]))
        .unwrap();
        let summary = summarize(&[], &rows, &[], &[]);
        assert_eq!(summary.total_attendances, 8);
    }

    #[test]
    fn attendance_sum_falls_back_to_row_count() {
        let rows: Vec<AttendanceStat> = serde_json::from_value(json!([
            {"TrainingClassId": 1},
            {"TrainingClassId": 2}
        ]))
        .unwrap();
        let summary = summarize(&[], &rows, &[], &[]);
        assert_eq!(summary.total_attendances, 2);
    }

    #[test]
    fn members_count_distinct_by_id() {
        let members: Vec<ActiveMember> = serde_json::from_value(json!([
            {"MemberId": 9, "OfficeCode": "E1"},
            {"MemberId": 9, "OfficeCode": "E2"},
            {"MemberId": 10, "OfficeCode": "W1"}
        ]))
        .unwrap();
        let summary = summarize(&[], &[], &[], &members);
        assert_eq!(summary.active_members, 2);
    }

    #[test]
    fn member_filter_prefers_offices_then_resolves_aors() {
        let members: Vec<ActiveMember> = serde_json::from_value(json!([
            {"MemberId": 9, "OfficeCode": "E1"},
            {"MemberId": 10, "OfficeCode": "W1"}
        ]))
        .unwrap();
        let office_dim: Vec<Office> = serde_json::from_value(json!([
            {"OfficeCode": "E1", "AorShortName": "EAST"},
            {"OfficeCode": "W1", "AorShortName": "WEST"}
        ]))
        .unwrap();

        let by_office = filter_members(
            &members,
            &Selection::new(["W1"]),
            &Selection::new(["EAST"]), // ignored: explicit offices win
            &office_dim,
        );
        assert_eq!(by_office.len(), 1);
        assert_eq!(by_office[0].member_id, "10");

        let by_aor = filter_members(
            &members,
            &Selection::default(),
            &Selection::new(["EAST"]),
            &office_dim,
        );
        assert_eq!(by_aor.len(), 1);
        assert_eq!(by_aor[0].member_id, "9");

        let unfiltered = filter_members(
            &members,
            &Selection::all(),
            &Selection::default(),
            &office_dim,
        );
        assert_eq!(unfiltered.len(), 2);
    }

    #[test]
    fn stat_predicates_apply_in_order_and_only_when_carried() {
        let rows: Vec<AttendanceStat> = serde_json::from_value(json!([
            {"TrainingClassId": 1, "AorShortName": "EAST", "TrainingTopicId": 7,
             "StartTime": "Feb-04-25@6 PM"},
            {"TrainingClassId": 2, "AorShortName": "WEST", "TrainingTopicId": 7},
            {"TrainingClassId": 3, "TrainingTopicId": 8}
        ]))
        .unwrap();
        let none = Selection::default();

        // Row 3 has no AOR field, so the AOR filter does not touch it.
        let east = filter_attendance(&rows, &Selection::new(["EAST"]), None, &none, &none, &none);
        assert_eq!(east.len(), 2);

        // Topic filter drops row 3; rows without a timestamp pass the range.
        let range = DateRange::parse("2025-02-01", "2025-02-28").unwrap();
        let kept = filter_attendance(
            &rows,
            &none,
            Some(&range),
            &Selection::new(["7"]),
            &none,
            &none,
        );
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn formatted_cards_use_thousands_separators() {
        let summary = MetricsSummary {
            total_classes: 12,
            total_attendances: 1234567,
            total_requests: 0,
            active_members: 1000,
        };
        assert_eq!(
            summary.formatted(),
            ["12".to_string(), "1,234,567".to_string(), "0".to_string(), "1,000".to_string()]
        );
    }

    #[test]
    fn empty_inputs_yield_the_zero_tuple() {
        let summary = summarize(&[], &[], &[], &[]);
        assert_eq!(summary, MetricsSummary::zero());
        assert_eq!(summary.formatted(), ["0", "0", "0", "0"].map(String::from));
    }
}
