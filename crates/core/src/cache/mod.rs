//! In-memory cache of discovered webmention endpoints.
//!
//! Maps a [`CacheKey`] to either an endpoint URL or an explicit "no endpoint"
//! marker. Absence of a key means "never checked or expired".
//!
//! - Bounded by entry count and a time-to-live (moka handles both)
//! - Writes are serialized behind a single lock; reads are lock-free

pub mod key;

pub use key::{CacheKey, domain_from_url};

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::AppConfig;

/// Default maximum number of cached endpoints.
pub const DEFAULT_MAX_ENTRIES: u64 = 100_000;

/// Default TTL for cached endpoints (one year).
pub const DEFAULT_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Outcome of a past discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedEndpoint {
    /// Discovery found this endpoint.
    Found(String),
    /// Discovery ran and found nothing.
    NoEndpoint,
}

impl CachedEndpoint {
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            CachedEndpoint::Found(endpoint) => Some(endpoint),
            CachedEndpoint::NoEndpoint => None,
        }
    }

    pub fn into_endpoint(self) -> Option<String> {
        match self {
            CachedEndpoint::Found(endpoint) => Some(endpoint),
            CachedEndpoint::NoEndpoint => None,
        }
    }
}

impl From<Option<String>> for CachedEndpoint {
    fn from(endpoint: Option<String>) -> Self {
        endpoint.map_or(CachedEndpoint::NoEndpoint, CachedEndpoint::Found)
    }
}

/// Thread-safe endpoint cache.
///
/// Construct one per process (or per independent client) and share it via
/// `Arc`.
pub struct EndpointCache {
    entries: moka::sync::Cache<CacheKey, CachedEndpoint>,
    write_lock: Mutex<()>,
}

impl EndpointCache {
    /// Create a cache holding at most `max_entries` entries, each living for `ttl`.
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        Self {
            entries: moka::sync::Cache::builder()
                .max_capacity(max_entries)
                .time_to_live(ttl)
                .build(),
            write_lock: Mutex::new(()),
        }
    }

    /// Create a cache sized from the application configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.cache_max_entries, config.cache_ttl())
    }

    /// Look up a key. Expired entries are reported as absent.
    pub fn get(&self, key: &CacheKey) -> Option<CachedEndpoint> {
        self.entries.get(key)
    }

    /// Insert or overwrite an entry, restarting its TTL.
    pub fn put(&self, key: CacheKey, value: CachedEndpoint) {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        tracing::debug!(key = %key, endpoint = ?value.endpoint(), "caching webmention endpoint");
        self.entries.insert(key, value);
    }

    /// Number of live entries.
    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Evict all entries.
    pub fn clear(&self) {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.entries.invalidate_all();
        self.entries.run_pending_tasks();
    }
}

impl Default for EndpointCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES, DEFAULT_TTL)
    }
}
