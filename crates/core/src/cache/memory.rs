//! In-process cache store backed by a concurrent map.

use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use regex::Regex;
use tokio::time::Instant;

use super::{CacheError, CacheStore};
use crate::errors::Result;

#[derive(Clone, Debug)]
struct Entry {
    value: Vec<u8>,
    /// `None` when the TTL is too large to represent.
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

/// TTL store held in memory.
///
/// Expired entries are dropped lazily on read and in bulk by
/// [`purge_expired`](CacheStore::purge_expired).
#[derive(Default)]
pub struct MemoryCacheStore {
    entries: DashMap<String, Entry>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let now = Instant::now();
        let value = match self.entries.get(key) {
            Some(entry) if entry.is_live(now) => return Ok(Some(entry.value.clone())),
            Some(_) => None,
            None => return Ok(None),
        };
        // Expired: guard released above, safe to remove
        self.entries.remove_if(key, |_, entry| !entry.is_live(now));
        Ok(value)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        self.entries.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: Instant::now().checked_add(ttl),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.entries.remove(key).is_some())
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let matcher = glob_to_regex(pattern)?;
        let now = Instant::now();
        let mut keys: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| entry.value().is_live(now) && matcher.is_match(entry.key()))
            .map(|entry| entry.key().clone())
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let now = Instant::now();
        Ok(self
            .entries
            .get(key)
            .map(|entry| entry.is_live(now))
            .unwrap_or(false))
    }

    async fn purge_expired(&self) -> Result<usize> {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live(now));
        Ok(before.saturating_sub(self.entries.len()))
    }
}

/// Compile a glob with `*` (any run) and `?` (any single char) into an
/// anchored regex. Every other character matches literally.
pub(crate) fn glob_to_regex(pattern: &str) -> Result<Regex> {
    let mut source = String::with_capacity(pattern.len() + 2);
    source.push('^');
    let mut buf = [0u8; 4];
    for c in pattern.chars() {
        match c {
            '*' => source.push_str("(?s:.*)"),
            '?' => source.push_str("(?s:.)"),
            _ => source.push_str(&regex::escape(c.encode_utf8(&mut buf))),
        }
    }
    source.push('$');
    let regex = Regex::new(&source).map_err(CacheError::from)?;
    Ok(regex)
}
