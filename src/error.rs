use std::path::PathBuf;

use thiserror::Error;

/// Failures internal to the cache store.
///
/// These never reach callers of the public cache API: `get` translates them
/// to a miss and `set` to `false`, logging the cause. The enum exists so the
/// store's internals can use `?` and report a single, well-typed reason.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache record serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("cache entry expired ({age_ms} ms old, ttl {ttl_ms} ms)")]
    Expired { age_ms: i64, ttl_ms: i64 },

    #[error("cache root directory unavailable: {0}")]
    RootUnavailable(PathBuf),
}
