//! Filtering and caching core for the training analytics dashboard.
//!
//! The dashboard holds one denormalized relational snapshot per session
//! (AOR → Office → Topic → Instructor → Location → Class, plus attendance
//! and request fact tables) and narrows it through cascading dropdown
//! filters. This crate provides the data layer behind that UI:
//!
//! - [`cache::CacheStore`]: namespaced key/value cache with TTL expiry
//!   and byte-size accounting, shared across dashboards
//! - [`manager::DatasetManager`]: per-dashboard snapshot holder, populated
//!   cache-first with write-through of bulk loads
//! - [`filter::FilterEngine`]: pure cascading derivations of dependent
//!   option sets from the loaded snapshot
//! - [`metrics`]: summary-card aggregation over filtered rows
//!
//! All public entry points fail soft: storage trouble degrades to a cache
//! miss, an unready manager yields empty derivations, and malformed rows
//! are dropped rather than surfaced as errors.

pub mod cache;
pub mod error;
pub mod filter;
pub mod manager;
pub mod metrics;
pub mod models;

pub use cache::{CacheStore, SHARED_NAMESPACE};
pub use error::CacheError;
pub use filter::{FilterEngine, Selection, ALL_SENTINEL};
pub use manager::{BulkPayload, DatasetConfig, DatasetKey, DatasetManager, IntegrityReport};
pub use metrics::{DateRange, MetricsSummary};
