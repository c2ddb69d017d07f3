use std::collections::HashSet;

use crate::manager::DatasetManager;
use crate::models::{Class, Instructor, Location, Office, Topic};

use super::Selection;

/// Output of [`FilterEngine::classes`]: the narrowed class list, plus the
/// full topic table so callers can build labels without a second lookup.
#[derive(Debug, Clone, Default)]
pub struct ClassResult {
    pub classes: Vec<Class>,
    pub topics: Vec<Topic>,
}

/// Pure cascading derivations over a [`DatasetManager`] snapshot.
///
/// Every method returns an empty collection while the manager is not
/// ready; callers poll readiness instead of handling errors.
pub struct FilterEngine<'a> {
    manager: &'a DatasetManager,
}

impl<'a> FilterEngine<'a> {
    pub fn new(manager: &'a DatasetManager) -> Self {
        Self { manager }
    }

    /// Offices whose AOR is selected.
    pub fn offices(&self, aors: &Selection) -> Vec<Office> {
        if !self.manager.is_ready() {
            return Vec::new();
        }
        self.manager
            .offices()
            .iter()
            .filter(|o| aors.permits(&o.aor_short_name))
            .cloned()
            .collect()
    }

    /// Topics reachable through the fact tables under the AOR and office
    /// selections. With no active upstream selection there is nothing to
    /// narrow by, so the full table comes back; a topic no fact row happens
    /// to reference must still be offered.
    pub fn topics(&self, aors: &Selection, offices: &Selection) -> Vec<Topic> {
        if !self.manager.is_ready() {
            return Vec::new();
        }
        if !aors.is_active() && !offices.is_active() {
            return self.manager.topics().to_vec();
        }
        let reachable = self.reachable_keys(
            aors,
            offices,
            &Selection::default(),
            &Selection::default(),
            |att| att.topic_id.as_deref(),
            |req| req.topic_id.as_deref(),
        );
        self.manager
            .topics()
            .iter()
            .filter(|t| reachable.contains(t.topic_id.as_str()))
            .cloned()
            .collect()
    }

    /// Instructors reachable through the fact tables under the AOR and
    /// office selections. Request stats carry no instructor column, so only
    /// attendance rows contribute here.
    pub fn instructors(&self, aors: &Selection, offices: &Selection) -> Vec<Instructor> {
        if !self.manager.is_ready() {
            return Vec::new();
        }
        if !aors.is_active() && !offices.is_active() {
            return self.manager.instructors().to_vec();
        }
        let reachable = self.reachable_keys(
            aors,
            offices,
            &Selection::default(),
            &Selection::default(),
            |att| att.instructor_id.as_deref(),
            |_| None,
        );
        self.manager
            .instructors()
            .iter()
            .filter(|i| reachable.contains(i.instructor_id.as_str()))
            .cloned()
            .collect()
    }

    /// Locations reachable under AOR, office, topic AND instructor
    /// selections; the chain is one step deeper than topics/instructors.
    pub fn locations(
        &self,
        aors: &Selection,
        offices: &Selection,
        topics: &Selection,
        instructors: &Selection,
    ) -> Vec<Location> {
        if !self.manager.is_ready() {
            return Vec::new();
        }
        if !aors.is_active() && !offices.is_active() && !topics.is_active() && !instructors.is_active()
        {
            return self.manager.locations().to_vec();
        }
        let reachable = self.reachable_keys(
            aors,
            offices,
            topics,
            instructors,
            |att| att.location_id.as_deref(),
            |_| None,
        );
        self.manager
            .locations()
            .iter()
            .filter(|l| reachable.contains(l.location_id.as_str()))
            .cloned()
            .collect()
    }

    /// Classes surviving every active upstream selection.
    ///
    /// The four direct predicates (AOR, instructor, location, topic) apply
    /// independently per row. Class rows carry no office column, so an
    /// active office selection intersects with the class ids reachable
    /// through office-filtered attendance rows instead.
    pub fn classes(
        &self,
        aors: &Selection,
        offices: &Selection,
        instructors: &Selection,
        locations: &Selection,
        topics: &Selection,
    ) -> ClassResult {
        if !self.manager.is_ready() {
            return ClassResult::default();
        }
        let mut classes: Vec<Class> = self
            .manager
            .classes()
            .iter()
            .filter(|c| {
                aors.permits(&c.aor_short_name)
                    && instructors.permits(&c.instructor_id)
                    && locations.permits(&c.location_id)
                    && topics.permits(&c.topic_id)
            })
            .cloned()
            .collect();

        if offices.is_active() {
            // A row that names no office proves no office membership, so
            // only rows with a selected MemberOffice vouch for a class.
            let reachable: HashSet<&str> = self
                .manager
                .attendance_stats()
                .iter()
                .filter(|s| offices.permits_strict(s.member_office.as_deref()))
                .filter_map(|s| s.class_id.as_deref())
                .collect();
            classes.retain(|c| reachable.contains(c.class_id.as_str()));
        }

        ClassResult {
            classes,
            topics: self.manager.topics().to_vec(),
        }
    }

    /// Union of the foreign-key values referenced by fact rows that survive
    /// the upstream selections. Attendance and request stats are both
    /// scanned; rows lacking the extracted key contribute nothing, and an
    /// active filter drops rows that do not carry the filtered field -- a
    /// row naming no office cannot vouch for anything office-reachable.
    fn reachable_keys(
        &self,
        aors: &Selection,
        offices: &Selection,
        topics: &Selection,
        instructors: &Selection,
        attendance_key: impl Fn(&crate::models::AttendanceStat) -> Option<&str>,
        request_key: impl Fn(&crate::models::RequestStat) -> Option<&str>,
    ) -> HashSet<String> {
        let mut keys = HashSet::new();
        for row in self.manager.attendance_stats() {
            if !aors.permits_strict(row.aor_short_name.as_deref())
                || !offices.permits_strict(row.member_office.as_deref())
                || !topics.permits_strict(row.topic_id.as_deref())
                || !instructors.permits_strict(row.instructor_id.as_deref())
            {
                continue;
            }
            if let Some(key) = attendance_key(row) {
                keys.insert(key.to_string());
            }
        }
        for row in self.manager.request_stats() {
            if !aors.permits_strict(row.aor_short_name.as_deref())
                || !offices.permits_strict(row.member_office.as_deref())
                || !topics.permits_strict(row.topic_id.as_deref())
            {
                continue;
            }
            if let Some(key) = request_key(row) {
                keys.insert(key.to_string());
            }
        }
        keys
    }
}

// ============================================================================
// Tests
// ============================================================================
