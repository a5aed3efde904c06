use super::{CacheStore, source_list_cache_key};
use crate::extractor::error::ParserError;
use crate::extractor::session::Session;
use crate::extractor::video_parser::{VideoParser, ensure_not_empty};
use crate::source::Outcome;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Memoizing wrapper around a [`VideoParser`].
///
/// All three outcomes are cacheable values: a denied or unsupported video
/// is remembered for the TTL window exactly like a found one, so repeat
/// lookups of a dead video stop hitting the network.
///
/// The read-fetch-write sequence holds no lock across the network call;
/// two concurrent lookups of the same pair may both miss and both fetch,
/// with last-write-wins on the store. Fetches for the same pair are
/// idempotent, so that is an accepted inefficiency.
pub struct CachedVideoParser {
    inner: Arc<dyn VideoParser>,
    store: Option<Arc<dyn CacheStore>>,
}

impl CachedVideoParser {
    pub fn new(inner: Arc<dyn VideoParser>, store: Option<Arc<dyn CacheStore>>) -> Self {
        Self { inner, store }
    }

    /// Cached lookup. `use_cache = false`, or a parser built without a
    /// store, skips both the read and the write. `ttl_seconds = None`
    /// stores entries without expiry; zero is an argument violation.
    pub async fn get_source_list_cached(
        &self,
        owner_id: &str,
        video_id: &str,
        session: Option<&Session>,
        use_cache: bool,
        ttl_seconds: Option<u64>,
    ) -> Result<Outcome, ParserError> {
        ensure_not_empty("owner_id", owner_id)?;
        ensure_not_empty("video_id", video_id)?;
        if ttl_seconds == Some(0) {
            return Err(ParserError::InvalidArgument(
                "ttl_seconds must be positive when present".to_string(),
            ));
        }

        let store = match &self.store {
            Some(store) if use_cache => Some(store.as_ref()),
            _ => {
                debug!("cache disabled for this lookup");
                None
            }
        };

        if let Some(store) = store {
            let key = source_list_cache_key(owner_id, video_id);

            if let Some(outcome) = read_entry(store, &key).await? {
                debug!(key = %key, "cache hit");
                return Ok(outcome);
            }
            debug!(key = %key, "cache miss");

            let outcome = self.inner.get_source_list(owner_id, video_id, session).await?;
            write_entry(store, &key, &outcome, ttl_seconds).await?;
            return Ok(outcome);
        }

        self.inner.get_source_list(owner_id, video_id, session).await
    }
}

async fn read_entry(store: &dyn CacheStore, key: &str) -> Result<Option<Outcome>, ParserError> {
    if !store.contains(key).await? {
        return Ok(None);
    }

    // The entry can expire between `contains` and `get`; that is a miss,
    // not corruption.
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };

    let outcome =
        serde_json::from_str(&raw).map_err(|e| ParserError::MalformedCacheEntry {
            key: key.to_owned(),
            reason: e.to_string(),
        })?;
    Ok(Some(outcome))
}

async fn write_entry(
    store: &dyn CacheStore,
    key: &str,
    outcome: &Outcome,
    ttl_seconds: Option<u64>,
) -> Result<(), ParserError> {
    let raw = serde_json::to_string(outcome)?;
    debug!(key = %key, ttl = ?ttl_seconds, "storing outcome");
    store.set(key, raw, ttl_seconds).await?;
    Ok(())
}

/// Plain trait lookups go through the cache with no expiry, mirroring the
/// uncached parser signature.
#[async_trait]
impl VideoParser for CachedVideoParser {
    async fn get_source_list(
        &self,
        owner_id: &str,
        video_id: &str,
        session: Option<&Session>,
    ) -> Result<Outcome, ParserError> {
        self.get_source_list_cached(owner_id, video_id, session, true, None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCacheStore;
    use crate::source::{Quality, SourceList};
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Inner parser yielding a fixed outcome and counting invocations.
    struct CountingParser {
        outcome: Outcome,
        calls: AtomicUsize,
    }

    impl CountingParser {
        fn new(outcome: Outcome) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl VideoParser for CountingParser {
        async fn get_source_list(
            &self,
            _owner_id: &str,
            _video_id: &str,
            _session: Option<&Session>,
        ) -> Result<Outcome, ParserError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.outcome.clone())
        }
    }

    fn found_outcome() -> Outcome {
        let mut static_sources = BTreeMap::new();
        static_sources.insert(Quality::P480, "https://a.com/v.480.mp4".to_string());
        Outcome::Found(SourceList {
            static_sources,
            embed: None,
            stream: Some("https://a.com/s.m3u8".to_string()),
        })
    }

    #[tokio::test]
    async fn test_second_lookup_served_from_cache() {
        let inner = CountingParser::new(found_outcome());
        let store = Arc::new(MemoryCacheStore::new());
        let parser = CachedVideoParser::new(inner.clone(), Some(store.clone()));

        let first = parser
            .get_source_list_cached("-1", "2", None, true, None)
            .await
            .unwrap();
        assert_eq!(first, found_outcome());
        assert_eq!(inner.calls(), 1);
        assert_eq!(store.len(), 1);

        let second = parser
            .get_source_list_cached("-1", "2", None, true, None)
            .await
            .unwrap();
        assert_eq!(second, first);
        assert_eq!(inner.calls(), 1, "cache hit must not refetch");
    }

    #[tokio::test]
    async fn test_denied_and_unsupported_are_cached_values() {
        for outcome in [Outcome::Denied, Outcome::Unsupported] {
            let inner = CountingParser::new(outcome.clone());
            let store = Arc::new(MemoryCacheStore::new());
            let parser = CachedVideoParser::new(inner.clone(), Some(store));

            let first = parser
                .get_source_list_cached("-1", "2", None, true, None)
                .await
                .unwrap();
            let second = parser
                .get_source_list_cached("-1", "2", None, true, None)
                .await
                .unwrap();
            assert_eq!(first, outcome);
            assert_eq!(second, outcome);
            assert_eq!(inner.calls(), 1);
        }
    }

    #[tokio::test]
    async fn test_use_cache_false_bypasses_store() {
        let inner = CountingParser::new(found_outcome());
        let store = Arc::new(MemoryCacheStore::new());
        let parser = CachedVideoParser::new(inner.clone(), Some(store.clone()));

        parser
            .get_source_list_cached("-1", "2", None, false, None)
            .await
            .unwrap();
        parser
            .get_source_list_cached("-1", "2", None, false, None)
            .await
            .unwrap();

        assert_eq!(inner.calls(), 2);
        assert!(store.is_empty(), "bypassed lookups must not write");
    }

    #[tokio::test]
    async fn test_no_store_delegates() {
        let inner = CountingParser::new(found_outcome());
        let parser = CachedVideoParser::new(inner.clone(), None);

        let outcome = parser
            .get_source_list_cached("-1", "2", None, true, None)
            .await
            .unwrap();
        assert_eq!(outcome, found_outcome());
        assert_eq!(inner.calls(), 1);
    }

    #[tokio::test]
    async fn test_entry_expires_and_refetches() {
        let inner = CountingParser::new(found_outcome());
        let store = Arc::new(MemoryCacheStore::new());
        let parser = CachedVideoParser::new(inner.clone(), Some(store));

        parser
            .get_source_list_cached("-1", "2", None, true, Some(1))
            .await
            .unwrap();
        std::thread::sleep(std::time::Duration::from_millis(1200));
        parser
            .get_source_list_cached("-1", "2", None, true, Some(1))
            .await
            .unwrap();

        assert_eq!(inner.calls(), 2);
    }

    #[tokio::test]
    async fn test_malformed_entry_fails_loudly() {
        let inner = CountingParser::new(found_outcome());
        let store = Arc::new(MemoryCacheStore::new());
        let key = source_list_cache_key("-1", "2");
        store.set(&key, "not json".to_string(), None).await.unwrap();

        let parser = CachedVideoParser::new(inner.clone(), Some(store));
        let err = parser
            .get_source_list_cached("-1", "2", None, true, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ParserError::MalformedCacheEntry { .. }));
        assert_eq!(inner.calls(), 0, "corruption must not fall through to a fetch");
    }

    #[tokio::test]
    async fn test_argument_violations_precede_io() {
        let inner = CountingParser::new(found_outcome());
        let store = Arc::new(MemoryCacheStore::new());
        let parser = CachedVideoParser::new(inner.clone(), Some(store.clone()));

        let err = parser
            .get_source_list_cached("", "2", None, true, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ParserError::InvalidArgument(_)));

        let err = parser
            .get_source_list_cached("-1", "2", None, true, Some(0))
            .await
            .unwrap_err();
        assert!(matches!(err, ParserError::InvalidArgument(_)));

        assert_eq!(inner.calls(), 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_trait_impl_uses_cache() {
        let inner = CountingParser::new(found_outcome());
        let store = Arc::new(MemoryCacheStore::new());
        let parser = CachedVideoParser::new(inner.clone(), Some(store));

        parser.get_source_list("-1", "2", None).await.unwrap();
        parser.get_source_list("-1", "2", None).await.unwrap();
        assert_eq!(inner.calls(), 1);
    }
}
