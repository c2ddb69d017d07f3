use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CacheError;

/// Consider a cache entry stale after 1 hour.
/// Balances freshness with skipping the bulk reload for slowly-changing data.
pub const DEFAULT_TTL: Duration = Duration::from_millis(3_600_000);

/// Namespace for datasets shared across dashboards. Unrecognized namespace
/// names also alias here rather than erroring.
pub const SHARED_NAMESPACE: &str = "shared";

/// The dashboards this deployment knows about, plus the shared namespace.
const KNOWN_NAMESPACES: [&str; 4] = ["training", "compliance", "workflow", SHARED_NAMESPACE];

/// Directory name under the platform cache dir for [`CacheStore::open_default`].
const APP_NAME: &str = "training-dashboard";

/// On-disk record layout: one JSON file per (namespace, key).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheRecord {
    key: String,
    value: serde_json::Value,
    /// Epoch milliseconds at the time of the write.
    timestamp: i64,
    #[serde(rename = "dataType")]
    data_type: String,
    /// Namespace the record was written under.
    dashboard: String,
    /// Serialized byte size of `value`.
    size: u64,
}

/// Per-namespace cache usage, from [`CacheStore::stats`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceStats {
    pub item_count: usize,
    pub total_size_bytes: u64,
}

/// Usage across all namespaces, keyed by normalized namespace name.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub namespaces: BTreeMap<String, NamespaceStats>,
}

impl CacheStats {
    pub fn total_items(&self) -> usize {
        self.namespaces.values().map(|ns| ns.item_count).sum()
    }

    pub fn total_size_bytes(&self) -> u64 {
        self.namespaces.values().map(|ns| ns.total_size_bytes).sum()
    }
}

/// File-backed key/value cache partitioned by dashboard namespace.
///
/// Every public operation fails soft: a miss, I/O error, corrupt record, or
/// expired entry all read as absent, and a failed write reads as "not
/// cached". Directories are created lazily on first use, so the store is
/// safe to call before anything else has touched the disk.
pub struct CacheStore {
    root: PathBuf,
    ttl: Duration,
}

impl CacheStore {
    /// Store rooted at an explicit directory, with the default TTL.
    pub fn new(root: PathBuf) -> Self {
        Self { root, ttl: DEFAULT_TTL }
    }

    /// Store rooted at the platform cache directory.
    pub fn open_default() -> anyhow::Result<Self> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(Self::new(cache_dir.join(APP_NAME)))
    }

    /// Override the TTL; entries older than this read as absent.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Lowercase the namespace and alias anything unrecognized to the
    /// shared namespace.
    fn normalize_namespace(namespace: &str) -> String {
        let lowered = namespace.to_ascii_lowercase();
        if KNOWN_NAMESPACES.contains(&lowered.as_str()) {
            lowered
        } else {
            SHARED_NAMESPACE.to_string()
        }
    }

    fn record_path(&self, namespace: &str, key: &str) -> PathBuf {
        self.root.join(namespace).join(format!("{}.json", key))
    }

    /// Read a value, treating expired entries as absent and purging them.
    pub async fn get<T: DeserializeOwned>(&self, namespace: &str, key: &str) -> Option<T> {
        let namespace = Self::normalize_namespace(namespace);
        match self.read_record(&namespace, key).await {
            Ok(Some(record)) => match serde_json::from_value(record.value) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(%namespace, key, error = %e, "Cached value has unexpected shape");
                    None
                }
            },
            Ok(None) => None,
            Err(CacheError::Expired { age_ms, ttl_ms }) => {
                debug!(%namespace, key, age_ms, ttl_ms, "Purged expired cache entry");
                None
            }
            Err(e) => {
                warn!(%namespace, key, error = %e, "Cache read failed, treating as miss");
                None
            }
        }
    }

    async fn read_record(&self, namespace: &str, key: &str) -> Result<Option<CacheRecord>, CacheError> {
        let path = self.record_path(namespace, key);
        let contents = match tokio::fs::read(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let record: CacheRecord = serde_json::from_slice(&contents)?;

        let age_ms = Utc::now().timestamp_millis() - record.timestamp;
        let ttl_ms = self.ttl.as_millis() as i64;
        if age_ms > ttl_ms {
            // Lazy purge: an entry past its TTL is logically absent.
            let _ = tokio::fs::remove_file(&path).await;
            return Err(CacheError::Expired { age_ms, ttl_ms });
        }
        Ok(Some(record))
    }

    /// Write a value, overwriting any existing entry for (namespace, key).
    /// Returns false (and logs) on failure; the caller falls through to an
    /// in-memory-only state for the session.
    pub async fn set<T: Serialize>(&self, namespace: &str, key: &str, value: &T) -> bool {
        let namespace = Self::normalize_namespace(namespace);
        match self.write_record(&namespace, key, value).await {
            Ok(size) => {
                debug!(%namespace, key, size, "Cached dataset");
                true
            }
            Err(e) => {
                warn!(%namespace, key, error = %e, "Cache write failed, not cached");
                false
            }
        }
    }

    async fn write_record<T: Serialize>(
        &self,
        namespace: &str,
        key: &str,
        value: &T,
    ) -> Result<u64, CacheError> {
        let value = serde_json::to_value(value)?;
        let data_type = match &value {
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
            _ => "scalar",
        };
        let size = serde_json::to_vec(&value)?.len() as u64;
        let record = CacheRecord {
            key: key.to_string(),
            value,
            timestamp: Utc::now().timestamp_millis(),
            data_type: data_type.to_string(),
            dashboard: namespace.to_string(),
            size,
        };

        let path = self.record_path(namespace, key);
        let dir = path
            .parent()
            .ok_or_else(|| CacheError::RootUnavailable(self.root.clone()))?;
        tokio::fs::create_dir_all(dir).await?;

        // Write-then-rename keeps concurrent readers from seeing a torn record.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec(&record)?).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(size)
    }

    /// Remove a single entry; absent entries and I/O errors are ignored.
    pub async fn delete(&self, namespace: &str, key: &str) {
        let namespace = Self::normalize_namespace(namespace);
        let path = self.record_path(&namespace, key);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(%namespace, key, error = %e, "Cache delete failed");
            }
        }
    }

    /// Drop every entry in one namespace.
    pub async fn clear_namespace(&self, namespace: &str) {
        let namespace = Self::normalize_namespace(namespace);
        let dir = self.root.join(&namespace);
        if let Err(e) = tokio::fs::remove_dir_all(&dir).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(%namespace, error = %e, "Cache namespace clear failed");
            }
        }
    }

    /// Drop every entry in every namespace.
    pub async fn clear_all(&self) {
        if let Err(e) = tokio::fs::remove_dir_all(&self.root).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(error = %e, "Cache clear failed");
            }
        }
    }

    /// Per-namespace item counts and byte totals. Sizes come from the
    /// recorded serialized size, falling back to file length for records
    /// that fail to parse.
    pub async fn stats(&self) -> CacheStats {
        let mut stats = CacheStats::default();
        let mut namespaces = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(_) => return stats,
        };
        while let Ok(Some(ns_entry)) = namespaces.next_entry().await {
            let ns_name = ns_entry.file_name().to_string_lossy().into_owned();
            let mut ns_stats = NamespaceStats::default();
            let mut files = match tokio::fs::read_dir(ns_entry.path()).await {
                Ok(files) => files,
                Err(_) => continue,
            };
            while let Ok(Some(file)) = files.next_entry().await {
                if file.path().extension().and_then(|e| e.to_str()) != Some("json") {
                    continue;
                }
                ns_stats.item_count += 1;
                let size = match tokio::fs::read(file.path()).await {
                    Ok(bytes) => serde_json::from_slice::<CacheRecord>(&bytes)
                        .map(|r| r.size)
                        .unwrap_or(bytes.len() as u64),
                    Err(_) => 0,
                };
                ns_stats.total_size_bytes += size;
            }
            stats.namespaces.insert(ns_name, ns_stats);
        }
        stats
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> CacheStore {
        CacheStore::new(dir.path().join("cache"))
    }

    #[tokio::test]
    async fn round_trips_a_dataset() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        let rows = vec!["E1".to_string(), "W1".to_string()];
        assert!(store.set("training", "offices", &rows).await);
        let back: Vec<String> = store.get("training", "offices").await.unwrap();
        assert_eq!(back, rows);
    }

    #[tokio::test]
    async fn set_overwrites_existing_entry() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        assert!(store.set("training", "topics", &vec![1, 2]).await);
        assert!(store.set("training", "topics", &vec![3]).await);
        let back: Vec<i32> = store.get("training", "topics").await.unwrap();
        assert_eq!(back, vec![3]);
    }

    #[tokio::test]
    async fn expired_entry_reads_absent_and_is_purged() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir).with_ttl(Duration::from_millis(1));

        assert!(store.set("training", "aors", &vec!["EAST"]).await);
        tokio::time::sleep(Duration::from_millis(10)).await;

        let back: Option<Vec<String>> = store.get("training", "aors").await;
        assert!(back.is_none());
        // The stale file is gone, not just skipped.
        assert!(!dir.path().join("cache/training/aors.json").exists());
    }

    #[tokio::test]
    async fn namespaces_are_case_insensitive_and_unknown_aliases_to_shared() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        assert!(store.set("Training", "aors", &vec!["EAST"]).await);
        let back: Option<Vec<String>> = store.get("TRAINING", "aors").await;
        assert!(back.is_some());

        assert!(store.set("no-such-dashboard", "aors", &vec!["WEST"]).await);
        let shared: Vec<String> = store.get(SHARED_NAMESPACE, "aors").await.unwrap();
        assert_eq!(shared, vec!["WEST"]);
    }

    #[tokio::test]
    async fn corrupt_record_reads_as_miss() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        assert!(store.set("training", "classes", &vec![1]).await);
        let path = dir.path().join("cache/training/classes.json");
        std::fs::write(&path, b"not json at all").unwrap();

        let back: Option<Vec<i32>> = store.get("training", "classes").await;
        assert!(back.is_none());
    }

    #[tokio::test]
    async fn wrong_shape_reads_as_miss() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        assert!(store.set("training", "classes", &vec!["a"]).await);
        let back: Option<Vec<i32>> = store.get("training", "classes").await;
        assert!(back.is_none());
    }

    #[tokio::test]
    async fn delete_and_clear_namespace() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        store.set("training", "aors", &vec![1]).await;
        store.set("training", "topics", &vec![2]).await;
        store.set("workflow", "aors", &vec![3]).await;

        store.delete("training", "aors").await;
        assert!(store.get::<Vec<i32>>("training", "aors").await.is_none());
        assert!(store.get::<Vec<i32>>("training", "topics").await.is_some());

        store.clear_namespace("training").await;
        assert!(store.get::<Vec<i32>>("training", "topics").await.is_none());
        assert!(store.get::<Vec<i32>>("workflow", "aors").await.is_some());

        store.clear_all().await;
        assert!(store.get::<Vec<i32>>("workflow", "aors").await.is_none());
    }

    #[tokio::test]
    async fn stats_count_items_and_sizes_per_namespace() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        store.set("training", "aors", &vec!["EAST", "WEST"]).await;
        store.set("training", "topics", &vec!["1"]).await;
        store.set("workflow", "aors", &vec!["EAST"]).await;

        let stats = store.stats().await;
        assert_eq!(stats.namespaces["training"].item_count, 2);
        assert_eq!(stats.namespaces["workflow"].item_count, 1);
        assert!(stats.namespaces["training"].total_size_bytes > 0);
        assert_eq!(stats.total_items(), 3);
    }

    #[tokio::test]
    async fn operations_are_safe_before_any_write() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        assert!(store.get::<Vec<i32>>("training", "aors").await.is_none());
        store.delete("training", "aors").await;
        store.clear_namespace("training").await;
        store.clear_all().await;
        assert_eq!(store.stats().await.total_items(), 0);
    }
}
