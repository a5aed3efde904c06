use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParserError {
    /// Caller broke the argument contract (empty id, zero TTL). Raised
    /// before any I/O happens.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Transport-level failure: DNS, timeout, TLS, or a non-4xx error
    /// status. Never swallowed and never cached.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// The injected store failed to read or write.
    #[error("cache store error: {0}")]
    CacheStore(String),
    /// A stored payload did not decode to a known outcome shape. Surfaced
    /// loudly instead of being treated as a miss, so a corrupted store
    /// cannot silently mask real lookups.
    #[error("malformed cache entry for key {key}: {reason}")]
    MalformedCacheEntry { key: String, reason: String },
}
