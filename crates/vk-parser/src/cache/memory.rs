use super::CacheStore;
use crate::extractor::error::ParserError;
use async_trait::async_trait;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::time::{Duration, Instant};

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// In-process [`CacheStore`] with per-entry TTL.
///
/// Expired entries are dropped lazily on access; there is no sweeper
/// task. Intended for single-process use and tests, anything shared
/// between processes belongs in an external store.
#[derive(Default)]
pub struct MemoryCacheStore {
    entries: RwLock<FxHashMap<String, Entry>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn live_value(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // entry expired, drop it
        self.entries.write().remove(key);
        None
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn contains(&self, key: &str) -> Result<bool, ParserError> {
        Ok(self.live_value(key).is_some())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, ParserError> {
        Ok(self.live_value(key))
    }

    async fn set(
        &self,
        key: &str,
        value: String,
        ttl_seconds: Option<u64>,
    ) -> Result<bool, ParserError> {
        let expires_at = ttl_seconds.map(|secs| Instant::now() + Duration::from_secs(secs));
        self.entries
            .write()
            .insert(key.to_owned(), Entry { value, expires_at });
        Ok(true)
    }
}
