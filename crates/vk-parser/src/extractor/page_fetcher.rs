use super::error::ParserError;
use super::session::Session;
use async_trait::async_trait;
use rand::RngExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, StatusCode};
use tracing::debug;

/// Desktop user agents rotated per request.
const DESKTOP_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:127.0) Gecko/20100101 Firefox/127.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
];

fn random_desktop_ua() -> &'static str {
    DESKTOP_USER_AGENTS[rand::rng().random_range(0..DESKTOP_USER_AGENTS.len())]
}

/// A fetched page: the final response status plus the UTF-8 decoded body.
#[derive(Debug, Clone)]
pub struct PageResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Issues one GET for a page url with browser-like headers and the
/// optional session cookies attached.
///
/// Client errors (4xx) come back as an ordinary [`PageResponse`] so the
/// caller can interpret them; transport failures and server errors surface
/// as [`ParserError::Http`].
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(
        &self,
        url: &str,
        session: Option<&Session>,
    ) -> Result<PageResponse, ParserError>;
}

/// Production fetcher backed by a shared reqwest [`Client`].
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: Client,
    default_headers: HeaderMap,
}

impl HttpPageFetcher {
    pub fn new(client: Client) -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8",
            ),
        );
        default_headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("ru-RU,ru;q=0.8,en-US;q=0.6,en;q=0.4"),
        );
        default_headers.insert(
            HeaderName::from_static("upgrade-insecure-requests"),
            HeaderValue::from_static("1"),
        );
        // Do not set `Accept-Encoding` here.
        // Reqwest auto-adds it (and auto-decompresses) when the gzip and
        // deflate features are enabled, as long as the header is untouched.

        Self {
            client,
            default_headers,
        }
    }

    fn request(&self, url: &str, session: Option<&Session>) -> RequestBuilder {
        let mut headers = self.default_headers.clone();

        // user-agent rotates per request
        match HeaderValue::from_str(random_desktop_ua()) {
            Ok(value) => {
                headers.insert(reqwest::header::USER_AGENT, value);
            }
            Err(e) => {
                debug!(error = %e, "Invalid user-agent value; skipping");
            }
        }

        if let Some(cookie_header) = session.and_then(Session::header_value) {
            match HeaderValue::from_str(&cookie_header) {
                Ok(value) => {
                    headers.insert(reqwest::header::COOKIE, value);
                }
                Err(e) => {
                    // Malformed cookies: skip the header instead of sending
                    // an invalid value.
                    debug!(error = %e, "Failed to build Cookie header");
                }
            }
        }

        self.client.get(url).headers(headers)
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(
        &self,
        url: &str,
        session: Option<&Session>,
    ) -> Result<PageResponse, ParserError> {
        let response = self.request(url, session).send().await?;
        let status = response.status();

        // 5xx is a hard failure for callers; 4xx carries meaning and is
        // interpreted upstream.
        let response = if status.is_server_error() {
            response.error_for_status()?
        } else {
            response
        };

        let body = response.text().await?;
        debug!(status = %status, bytes = body.len(), "fetched page");

        Ok(PageResponse { status, body })
    }
}
