//! Per-dashboard dataset snapshots, populated cache-first.
//!
//! A [`DatasetManager`] owns one in-memory snapshot per required dataset
//! key. [`DatasetManager::load_all`] fills them from the injected
//! [`CacheStore`], falling back to the server's bulk payload and writing
//! adopted tables back through the cache. Snapshots are replace-only;
//! filtering never mutates them.

use std::collections::HashSet;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cache::{CacheStore, SHARED_NAMESPACE};
use crate::models::{
    ActiveMember, Aor, AttendanceStat, Class, Instructor, Location, Office, RequestStat, Topic,
};

/// The datasets a dashboard may require. String forms double as cache keys
/// and bulk-payload field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKey {
    Aors,
    Offices,
    Topics,
    Instructors,
    Locations,
    Classes,
    RequestStats,
    AttendanceStats,
    ActiveMembers,
}

impl DatasetKey {
    pub const ALL: [DatasetKey; 9] = [
        DatasetKey::Aors,
        DatasetKey::Offices,
        DatasetKey::Topics,
        DatasetKey::Instructors,
        DatasetKey::Locations,
        DatasetKey::Classes,
        DatasetKey::RequestStats,
        DatasetKey::AttendanceStats,
        DatasetKey::ActiveMembers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKey::Aors => "aors",
            DatasetKey::Offices => "offices",
            DatasetKey::Topics => "topics",
            DatasetKey::Instructors => "instructors",
            DatasetKey::Locations => "locations",
            DatasetKey::Classes => "classes",
            DatasetKey::RequestStats => "request_stats",
            DatasetKey::AttendanceStats => "attendance_stats",
            DatasetKey::ActiveMembers => "active_members",
        }
    }
}

impl std::fmt::Display for DatasetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which datasets a dashboard requires, and which of those are shared
/// across dashboards. Shared-key policy is plain data here, not a subclass
/// override: other dashboards build their own config the same way.
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    /// Cache namespace for this dashboard's private datasets.
    pub dashboard: String,
    /// Every key that must be loaded and non-empty before the dashboard is ready.
    pub required: Vec<DatasetKey>,
    /// Keys cached in the shared namespace and readable by any dashboard.
    pub shared: HashSet<DatasetKey>,
}

impl DatasetConfig {
    pub fn new(dashboard: impl Into<String>, required: Vec<DatasetKey>) -> Self {
        Self {
            dashboard: dashboard.into(),
            required,
            shared: HashSet::new(),
        }
    }

    pub fn with_shared(mut self, shared: impl IntoIterator<Item = DatasetKey>) -> Self {
        self.shared = shared.into_iter().collect();
        self
    }

    /// The Training dashboard: every dataset, with the org-tree dimensions
    /// shared across dashboards.
    pub fn training() -> Self {
        Self::new("training", DatasetKey::ALL.to_vec())
            .with_shared([DatasetKey::Aors, DatasetKey::Offices])
    }
}

/// Keyed bulk payload from the server: one array of rows per dataset.
/// Absent keys deserialize as empty and are treated as "not supplied".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkPayload {
    #[serde(default)]
    pub aors: Vec<Aor>,
    #[serde(default)]
    pub offices: Vec<Office>,
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub instructors: Vec<Instructor>,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub classes: Vec<Class>,
    #[serde(default)]
    pub request_stats: Vec<RequestStat>,
    #[serde(default)]
    pub attendance_stats: Vec<AttendanceStat>,
    #[serde(default)]
    pub active_members: Vec<ActiveMember>,
}

/// What [`DatasetManager::load_all`] managed to populate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOutcome {
    pub ready: Vec<DatasetKey>,
    pub missing: Vec<DatasetKey>,
}

impl LoadOutcome {
    pub fn is_ready(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Result of [`DatasetManager::validate_integrity`]: errors are missing
/// required datasets, warnings are dangling foreign keys. Reporting only;
/// nothing is repaired.
#[derive(Debug, Clone, Default)]
pub struct IntegrityReport {
    pub valid: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

#[derive(Debug, Default)]
struct Tables {
    aors: Vec<Aor>,
    offices: Vec<Office>,
    topics: Vec<Topic>,
    instructors: Vec<Instructor>,
    locations: Vec<Location>,
    classes: Vec<Class>,
    request_stats: Vec<RequestStat>,
    attendance_stats: Vec<AttendanceStat>,
    active_members: Vec<ActiveMember>,
}

impl Tables {
    fn len(&self, key: DatasetKey) -> usize {
        match key {
            DatasetKey::Aors => self.aors.len(),
            DatasetKey::Offices => self.offices.len(),
            DatasetKey::Topics => self.topics.len(),
            DatasetKey::Instructors => self.instructors.len(),
            DatasetKey::Locations => self.locations.len(),
            DatasetKey::Classes => self.classes.len(),
            DatasetKey::RequestStats => self.request_stats.len(),
            DatasetKey::AttendanceStats => self.attendance_stats.len(),
            DatasetKey::ActiveMembers => self.active_members.len(),
        }
    }
}

pub struct DatasetManager {
    config: DatasetConfig,
    store: CacheStore,
    tables: Tables,
}

impl DatasetManager {
    pub fn new(config: DatasetConfig, store: CacheStore) -> Self {
        Self {
            config,
            store,
            tables: Tables::default(),
        }
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    /// True once every required dataset is loaded and non-empty. Partial
    /// snapshots must not answer filter queries.
    pub fn is_ready(&self) -> bool {
        self.config
            .required
            .iter()
            .all(|key| self.tables.len(*key) > 0)
    }

    pub fn row_count(&self, key: DatasetKey) -> usize {
        self.tables.len(key)
    }

    pub fn aors(&self) -> &[Aor] {
        &self.tables.aors
    }

    pub fn offices(&self) -> &[Office] {
        &self.tables.offices
    }

    pub fn topics(&self) -> &[Topic] {
        &self.tables.topics
    }

    pub fn instructors(&self) -> &[Instructor] {
        &self.tables.instructors
    }

    pub fn locations(&self) -> &[Location] {
        &self.tables.locations
    }

    pub fn classes(&self) -> &[Class] {
        &self.tables.classes
    }

    pub fn request_stats(&self) -> &[RequestStat] {
        &self.tables.request_stats
    }

    pub fn attendance_stats(&self) -> &[AttendanceStat] {
        &self.tables.attendance_stats
    }

    pub fn active_members(&self) -> &[ActiveMember] {
        &self.tables.active_members
    }

    /// Populate every required dataset: cache first (shared namespace as a
    /// fallback for shared keys), then the bulk payload with write-through.
    /// Keys that stay empty are reported as missing, never errored.
    pub async fn load_all(&mut self, payload: Option<&BulkPayload>) -> LoadOutcome {
        for key in self.config.required.clone() {
            if self.tables.len(key) > 0 {
                continue;
            }
            match key {
                DatasetKey::Aors => {
                    self.tables.aors = self.load_one(key, payload.map(|p| &p.aors)).await;
                }
                DatasetKey::Offices => {
                    self.tables.offices = self.load_one(key, payload.map(|p| &p.offices)).await;
                }
                DatasetKey::Topics => {
                    self.tables.topics = self.load_one(key, payload.map(|p| &p.topics)).await;
                }
                DatasetKey::Instructors => {
                    self.tables.instructors =
                        self.load_one(key, payload.map(|p| &p.instructors)).await;
                }
                DatasetKey::Locations => {
                    self.tables.locations = self.load_one(key, payload.map(|p| &p.locations)).await;
                }
                DatasetKey::Classes => {
                    self.tables.classes = self.load_one(key, payload.map(|p| &p.classes)).await;
                }
                DatasetKey::RequestStats => {
                    self.tables.request_stats =
                        self.load_one(key, payload.map(|p| &p.request_stats)).await;
                }
                DatasetKey::AttendanceStats => {
                    self.tables.attendance_stats =
                        self.load_one(key, payload.map(|p| &p.attendance_stats)).await;
                }
                DatasetKey::ActiveMembers => {
                    self.tables.active_members =
                        self.load_one(key, payload.map(|p| &p.active_members)).await;
                }
            }
        }

        let mut outcome = LoadOutcome::default();
        for key in &self.config.required {
            if self.tables.len(*key) > 0 {
                outcome.ready.push(*key);
            } else {
                outcome.missing.push(*key);
            }
        }
        info!(
            dashboard = %self.config.dashboard,
            ready = outcome.ready.len(),
            missing = outcome.missing.len(),
            "Dataset load complete"
        );
        outcome
    }

    /// Cache-then-payload-then-write-back for a single key. Shared keys read
    /// from and write to the shared namespace; private keys stay in the
    /// dashboard namespace.
    async fn load_one<T>(&self, key: DatasetKey, supplied: Option<&Vec<T>>) -> Vec<T>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        let dashboard = self.config.dashboard.as_str();
        if let Some(rows) = self.store.get::<Vec<T>>(dashboard, key.as_str()).await {
            if !rows.is_empty() {
                debug!(dashboard, key = %key, rows = rows.len(), "Loaded dataset from cache");
                return rows;
            }
        }
        let shared = self.config.shared.contains(&key);
        if shared {
            if let Some(rows) = self.store.get::<Vec<T>>(SHARED_NAMESPACE, key.as_str()).await {
                if !rows.is_empty() {
                    debug!(key = %key, rows = rows.len(), "Loaded shared dataset from cache");
                    return rows;
                }
            }
        }

        if let Some(rows) = supplied {
            if !rows.is_empty() {
                let target = if shared { SHARED_NAMESPACE } else { dashboard };
                if !self.store.set(target, key.as_str(), rows).await {
                    warn!(key = %key, "Write-through failed; dataset held in memory only");
                }
                return rows.clone();
            }
        }

        debug!(dashboard, key = %key, "Dataset not in cache and not supplied");
        Vec::new()
    }

    /// Report missing required datasets and dangling foreign keys.
    pub fn validate_integrity(&self) -> IntegrityReport {
        let mut report = IntegrityReport::default();

        for key in &self.config.required {
            if self.tables.len(*key) == 0 {
                report
                    .errors
                    .push(format!("required dataset '{}' is missing or empty", key));
            }
        }

        let aors: HashSet<&str> = self.aors().iter().map(|a| a.short_name.as_str()).collect();
        let offices: HashSet<&str> = self
            .offices()
            .iter()
            .map(|o| o.office_code.as_str())
            .collect();
        let topics: HashSet<&str> = self.topics().iter().map(|t| t.topic_id.as_str()).collect();
        let instructors: HashSet<&str> = self
            .instructors()
            .iter()
            .map(|i| i.instructor_id.as_str())
            .collect();
        let locations: HashSet<&str> = self
            .locations()
            .iter()
            .map(|l| l.location_id.as_str())
            .collect();

        for class in self.classes() {
            let mut check = |set: &HashSet<&str>, dim: &str, value: &str| {
                if !set.contains(value) {
                    report.warnings.push(format!(
                        "class '{}' references unknown {} '{}'",
                        class.class_id, dim, value
                    ));
                }
            };
            check(&aors, "AOR", &class.aor_short_name);
            check(&topics, "topic", &class.topic_id);
            check(&instructors, "instructor", &class.instructor_id);
            check(&locations, "location", &class.location_id);
        }

        for (i, stat) in self.attendance_stats().iter().enumerate() {
            let mut check = |set: &HashSet<&str>, dim: &str, value: &Option<String>| {
                if let Some(value) = value {
                    if !set.contains(value.as_str()) {
                        report.warnings.push(format!(
                            "attendance stat #{} references unknown {} '{}'",
                            i, dim, value
                        ));
                    }
                }
            };
            check(&aors, "AOR", &stat.aor_short_name);
            check(&topics, "topic", &stat.topic_id);
            check(&instructors, "instructor", &stat.instructor_id);
            check(&locations, "location", &stat.location_id);
        }

        for (i, stat) in self.request_stats().iter().enumerate() {
            let mut check = |set: &HashSet<&str>, dim: &str, value: &Option<String>| {
                if let Some(value) = value {
                    if !set.contains(value.as_str()) {
                        report.warnings.push(format!(
                            "request stat #{} references unknown {} '{}'",
                            i, dim, value
                        ));
                    }
                }
            };
            check(&aors, "AOR", &stat.aor_short_name);
            check(&topics, "topic", &stat.topic_id);
        }

        for member in self.active_members() {
            if !offices.contains(member.office_code.as_str()) {
                report.warnings.push(format!(
                    "active member '{}' references unknown office '{}'",
                    member.member_id, member.office_code
                ));
            }
        }

        report.valid = report.errors.is_empty();
        report
    }
}

// ============================================================================
// Tests
// ============================================================================
