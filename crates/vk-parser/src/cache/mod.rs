pub mod cached_parser;
pub mod memory;

pub use cached_parser::CachedVideoParser;
pub use memory::MemoryCacheStore;

use crate::extractor::error::ParserError;
use async_trait::async_trait;
use md5::{Digest, Md5};

/// Namespace prefix of every stored source-list outcome.
const CACHE_KEY_PREFIX: &str = "parser.video.source_list.";

/// Minimal key/value contract the decorator expects from a store.
///
/// Expiry belongs to the store: `set` with `ttl_seconds = None` keeps the
/// value without an expiry, otherwise the store drops it on its own after
/// the window passes. Values are opaque strings.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn contains(&self, key: &str) -> Result<bool, ParserError>;

    async fn get(&self, key: &str) -> Result<Option<String>, ParserError>;

    async fn set(
        &self,
        key: &str,
        value: String,
        ttl_seconds: Option<u64>,
    ) -> Result<bool, ParserError>;
}

/// Deterministic cache key for an `(owner_id, video_id)` pair: the
/// namespace prefix plus the hex MD5 digest of the concatenated ids.
pub fn source_list_cache_key(owner_id: &str, video_id: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(owner_id.as_bytes());
    hasher.update(video_id.as_bytes());
    format!("{CACHE_KEY_PREFIX}{}", hex::encode(hasher.finalize()))
}
