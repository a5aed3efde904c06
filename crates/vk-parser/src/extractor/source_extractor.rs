use super::utils::{decode_json_string, quoted_value_after, text_between};
use crate::source::{Quality, SourceList};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;

/// Marker substring rendered on "video unavailable" error pages.
///
/// Known fragility: availability detection hangs on this single marker
/// and breaks silently if the error markup changes.
const ERROR_PAGE_MARKER: &str = "message_page_title";

/// Opens the script block that inlines the player payload.
const PRELOAD_MARKER: &str = "ajax.preload";

/// Quality suffix of a post-live recording url, e.g. `.../v.480.mp4`.
static MP4_QUALITY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.(\d+)\.mp4").expect("mp4 quality regex must compile")
});

/// False when the page body is an error page: the video is private,
/// removed or blocked.
pub fn is_available(page: &str) -> bool {
    !page.contains(ERROR_PAGE_MARKER)
}

/// Scans the page for progressive-download links, one `url{quality}"`
/// token per known quality. Qualities without a decodable url are left
/// out of the map.
///
/// When the primary scan comes up empty, a `postlive_mp4"` token is tried
/// as a recovery path (recently-ended live streams publish only that) and
/// filed under the quality its mp4 suffix names.
pub fn static_sources(page: &str) -> BTreeMap<Quality, String> {
    let mut sources = BTreeMap::new();

    for quality in Quality::ALL {
        let token = format!("url{}\"", quality.as_str());
        match quoted_value_after(page, &token) {
            Some(url) => {
                debug!(quality = quality.as_str(), url = %url, "found static source");
                sources.insert(quality, url);
            }
            None => {
                debug!(quality = quality.as_str(), "no static source");
            }
        }
    }

    if sources.is_empty()
        && let Some(url) = quoted_value_after(page, "postlive_mp4\"")
    {
        match post_live_quality(&url) {
            Some(quality) => {
                debug!(quality = quality.as_str(), url = %url, "using post-live source");
                sources.insert(quality, url);
            }
            None => {
                debug!(url = %url, "post-live source without a known quality suffix");
            }
        }
    }

    sources
}

fn post_live_quality(url: &str) -> Option<Quality> {
    MP4_QUALITY_REGEX
        .captures(url)
        .and_then(|caps| caps.get(1))
        .and_then(|m| Quality::from_str(m.as_str()))
}

/// Player page link usable in an iframe, taken from the first preload
/// script block. The block holds JS-escaped markup, so the iframe closing
/// tag and the `src` attribute quotes carry literal backslashes.
pub fn embed_source(page: &str) -> Option<String> {
    let block = text_between(page, PRELOAD_MARKER, "</script>")?;
    let iframe = text_between(block, "<iframe", r"<\/iframe")?;
    let raw = text_between(iframe, r#"src=\""#, r#"\""#)?;
    decode_json_string(raw)
}

/// HLS manifest link, taken from the `"hls"` key of the first preload
/// script block.
pub fn stream_source(page: &str) -> Option<String> {
    let block = text_between(page, PRELOAD_MARKER, "</script>")?;
    let window = text_between(block, "\"hls\"", ",")?;
    let raw = text_between(window, ":\"", "\"")?;
    decode_json_string(raw)
}

/// Runs every extraction rule over the page body.
pub fn extract_all(page: &str) -> SourceList {
    SourceList {
        static_sources: static_sources(page),
        embed: embed_source(page),
        stream: stream_source(page),
    }
}
