//! Extraction of playable source URLs from VK video pages.
//!
//! The parser fetches `https://vk.com/video{owner}_{id}` with browser-like
//! headers, scans the page body for progressive-download links (240p to
//! 1080p), an embeddable player url and an HLS manifest url, and reports a
//! three-way outcome: the video is denied (private, removed or blocked),
//! the page carries no recognizable source, or a [`SourceList`] was found.
//!
//! [`CachedVideoParser`] wraps any [`VideoParser`] and memoizes whole
//! outcomes, denied and unsupported included, behind a key/value store
//! implementing [`CacheStore`].

pub mod cache;
pub mod extractor;
pub mod source;

pub use cache::{CacheStore, CachedVideoParser, MemoryCacheStore, source_list_cache_key};
pub use extractor::default_client;
pub use extractor::error::ParserError;
pub use extractor::page_fetcher::{HttpPageFetcher, PageFetcher, PageResponse};
pub use extractor::session::Session;
pub use extractor::video_parser::{VideoParser, VkVideoParser};
pub use source::{Outcome, Quality, SourceList};
