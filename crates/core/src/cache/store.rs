//! Key-value store abstraction behind the cache layer.

use std::time::Duration;

use async_trait::async_trait;

use crate::errors::Result;

/// Key-value store with per-entry TTL.
///
/// Values are opaque bytes. Implementations may be remote, so every
/// operation is async and fallible; callers go through
/// [`CacheService`](super::CacheService), which absorbs failures.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Value for `key`, or `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()>;

    /// Remove `key`. Returns whether an entry was removed.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Live keys matching a glob pattern (`*` and `?` wildcards).
    async fn keys(&self, pattern: &str) -> Result<Vec<String>>;

    async fn exists(&self, key: &str) -> Result<bool>;

    /// Drop expired entries. Returns how many were removed.
    ///
    /// Stores with native expiry can keep the default no-op.
    async fn purge_expired(&self) -> Result<usize> {
        Ok(0)
    }
}
