use super::quality::Quality;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Playable source references extracted from a single video page.
///
/// `static_sources` holds the progressive mp4 links keyed by quality; only
/// qualities that were actually found are present, the map is never padded
/// with placeholders. `embed` is a third-party player page usable inside an
/// iframe, `stream` an HLS manifest url.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceList {
    #[serde(rename = "static", default)]
    pub static_sources: BTreeMap<Quality, String>,
    #[serde(default)]
    pub embed: Option<String>,
    #[serde(default)]
    pub stream: Option<String>,
}

impl SourceList {
    /// True when no extraction rule produced anything. An empty list is
    /// never surfaced to callers; the parser reports it as unsupported.
    pub fn is_empty(&self) -> bool {
        self.static_sources.is_empty() && self.embed.is_none() && self.stream.is_none()
    }
}
