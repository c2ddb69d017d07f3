//! Namespaced, TTL-expiring local cache.
//!
//! One logical store per dashboard namespace, each record keyed by dataset
//! name. Bulk loads are written through here and served back until they go
//! stale, so a returning session skips the expensive server round trip.

mod store;

pub use store::{CacheStats, CacheStore, NamespaceStats, DEFAULT_TTL, SHARED_NAMESPACE};
