use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use log::{debug, error};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{CacheError, CacheStore};

/// Default time-to-live for cached aggregates.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30);

/// Default key namespace.
pub const DEFAULT_CACHE_PREFIX: &str = "tokenpulse:";

/// Cache-aside front for a [`CacheStore`].
///
/// Every operation is fault tolerant: a failed read is a miss and a failed
/// write is logged and dropped. Callers stay correct with the store down.
/// All keys are namespaced under `prefix`.
#[derive(Clone)]
pub struct CacheService {
    store: Arc<dyn CacheStore>,
    prefix: String,
    default_ttl: Duration,
}

impl CacheService {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self::with_settings(store, DEFAULT_CACHE_PREFIX, DEFAULT_CACHE_TTL)
    }

    pub fn with_settings(
        store: Arc<dyn CacheStore>,
        prefix: impl Into<String>,
        default_ttl: Duration,
    ) -> Self {
        Self {
            store,
            prefix: prefix.into(),
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Derive a key as `operation:subject:base64(json(params))`.
    ///
    /// Identical parameters always produce identical keys, so callers should
    /// pass a struct with a stable field order rather than a hash map.
    pub fn cache_key<P: Serialize + ?Sized>(operation: &str, subject: &str, params: &P) -> String {
        let encoded = serde_json::to_vec(params)
            .map(|json| BASE64.encode(json))
            .unwrap_or_default();
        format!("{}:{}:{}", operation, subject, encoded)
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Typed read. Absent, expired, undecodable or failed reads are `None`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let full_key = self.namespaced(key);
        let bytes = match self.store.get(&full_key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!("Cache miss for '{}'", full_key);
                return None;
            }
            Err(e) => {
                error!("Cache get error for '{}': {}", full_key, e);
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => {
                debug!("Cache hit for '{}'", full_key);
                Some(value)
            }
            Err(e) => {
                error!(
                    "Cache get error for '{}': {}",
                    full_key,
                    CacheError::Serialization(e)
                );
                None
            }
        }
    }

    /// Typed write with `ttl`, or the default TTL when `None`.
    ///
    /// Returns whether the value was stored.
    pub async fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> bool {
        let full_key = self.namespaced(key);
        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(
                    "Cache set error for '{}': {}",
                    full_key,
                    CacheError::Serialization(e)
                );
                return false;
            }
        };

        match self
            .store
            .set(&full_key, bytes, ttl.unwrap_or(self.default_ttl))
            .await
        {
            Ok(()) => true,
            Err(e) => {
                error!("Cache set error for '{}': {}", full_key, e);
                false
            }
        }
    }

    pub async fn delete(&self, key: &str) {
        let full_key = self.namespaced(key);
        if let Err(e) = self.store.delete(&full_key).await {
            error!("Cache delete error for '{}': {}", full_key, e);
        }
    }

    pub async fn exists(&self, key: &str) -> bool {
        let full_key = self.namespaced(key);
        match self.store.exists(&full_key).await {
            Ok(exists) => exists,
            Err(e) => {
                error!("Cache exists error for '{}': {}", full_key, e);
                false
            }
        }
    }

    /// Delete every key in the namespace matching `pattern`.
    ///
    /// Returns the number of keys removed.
    pub async fn invalidate_pattern(&self, pattern: &str) -> usize {
        let full_pattern = self.namespaced(pattern);
        let keys = match self.store.keys(&full_pattern).await {
            Ok(keys) => keys,
            Err(e) => {
                error!("Cache pattern invalidation error for '{}': {}", full_pattern, e);
                return 0;
            }
        };

        let mut removed = 0;
        for key in keys {
            match self.store.delete(&key).await {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(e) => error!("Cache delete error for '{}': {}", key, e),
            }
        }
        removed
    }

    /// Drop expired entries from the store.
    pub async fn purge_expired(&self) -> usize {
        match self.store.purge_expired().await {
            Ok(count) => count,
            Err(e) => {
                error!("Cache cleanup error: {}", e);
                0
            }
        }
    }
}
