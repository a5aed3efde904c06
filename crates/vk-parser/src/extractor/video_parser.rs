use super::default_client;
use super::error::ParserError;
use super::page_fetcher::{HttpPageFetcher, PageFetcher};
use super::session::Session;
use super::source_extractor;
use crate::source::Outcome;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

const PAGE_URL_BASE: &str = "https://vk.com/video";

/// Looks up the playable sources of a video by its owner and video ids.
///
/// `Denied` and `Unsupported` describe the video, not a failure: the call
/// errs only on argument violations and transport problems.
#[async_trait]
pub trait VideoParser: Send + Sync {
    async fn get_source_list(
        &self,
        owner_id: &str,
        video_id: &str,
        session: Option<&Session>,
    ) -> Result<Outcome, ParserError>;
}

/// Facade that fetches the video page and runs the extraction rules over
/// its body.
pub struct VkVideoParser {
    fetcher: Arc<dyn PageFetcher>,
}

impl VkVideoParser {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            fetcher: Arc::new(HttpPageFetcher::new(client)),
        }
    }

    /// Builds the parser on a custom fetcher, e.g. an alternative
    /// transport or a canned one in tests.
    pub fn with_fetcher(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    fn page_url(owner_id: &str, video_id: &str) -> String {
        format!("{PAGE_URL_BASE}{owner_id}_{video_id}")
    }
}

impl Default for VkVideoParser {
    fn default() -> Self {
        Self::new(default_client())
    }
}

#[async_trait]
impl VideoParser for VkVideoParser {
    async fn get_source_list(
        &self,
        owner_id: &str,
        video_id: &str,
        session: Option<&Session>,
    ) -> Result<Outcome, ParserError> {
        ensure_not_empty("owner_id", owner_id)?;
        ensure_not_empty("video_id", video_id)?;

        let page_url = Self::page_url(owner_id, video_id);
        debug!(url = %page_url, "fetching video page");

        let response = self.fetcher.fetch_page(&page_url, session).await?;
        if response.status.is_client_error() {
            // The common "private or removed" signal.
            debug!(status = %response.status, "client error from page request");
            return Ok(Outcome::Denied);
        }

        if !source_extractor::is_available(&response.body) {
            debug!("video page reports no access");
            return Ok(Outcome::Denied);
        }

        let sources = source_extractor::extract_all(&response.body);
        if sources.is_empty() {
            debug!("no extractable source in page body");
            return Ok(Outcome::Unsupported);
        }

        debug!(
            static_levels = sources.static_sources.len(),
            has_embed = sources.embed.is_some(),
            has_stream = sources.stream.is_some(),
            "extracted source list"
        );
        Ok(Outcome::Found(sources))
    }
}

pub(crate) fn ensure_not_empty(name: &str, value: &str) -> Result<(), ParserError> {
    if value.is_empty() {
        return Err(ParserError::InvalidArgument(format!(
            "{name} must be a non-empty string"
        )));
    }
    Ok(())
}
