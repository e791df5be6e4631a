//! Page fetching for the comparison step.
//!
//! [`CurlFetcher`] uses the curl crate (libcurl) to GET a URL, following
//! redirects, and hands back the body as text. No HTML parsing is done; the
//! model gets the page as served, cut to a configured length.

mod parse;

use crate::config::FetchConfig;
use std::str;
use std::time::Duration;

pub use parse::{parse_headers, ResponseHeaders};

/// Maximum redirects followed per page.
const MAX_REDIRECTS: u32 = 10;

/// Content of one fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    /// URL as given in the source file.
    pub url: String,
    /// URL after redirects.
    pub effective_url: String,
    pub status: u32,
    pub content_type: Option<String>,
    /// Body decoded as UTF-8 (lossy).
    pub body: String,
    /// True if `body` was cut to the configured limit.
    pub truncated: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("GET {url} failed")]
    Curl {
        url: String,
        #[source]
        source: curl::Error,
    },
    #[error("GET {url} returned HTTP {status}")]
    Http { url: String, status: u32 },
}

/// Fetches the content behind a URL.
pub trait ContentFetcher {
    fn fetch(&self, url: &str) -> Result<PageContent, FetchError>;
}

/// Blocking libcurl fetcher. One Easy handle per request.
#[derive(Debug, Clone)]
pub struct CurlFetcher {
    connect_timeout: Duration,
    timeout: Duration,
    max_content_chars: usize,
    user_agent: String,
}

impl CurlFetcher {
    pub fn new(cfg: &FetchConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            timeout: Duration::from_secs(cfg.timeout_secs),
            max_content_chars: cfg.max_content_chars,
            user_agent: cfg.user_agent.clone(),
        }
    }

    fn perform(&self, url: &str) -> Result<PageContent, curl::Error> {
        let mut headers: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(MAX_REDIRECTS)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;
        easy.useragent(&self.user_agent)?;
        // Accept any encoding libcurl can decode.
        easy.accept_encoding("")?;

        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    headers.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        let effective_url = easy
            .effective_url()?
            .map(str::to_string)
            .unwrap_or_else(|| url.to_string());
        let parsed = parse_headers(&headers);
        let (body, truncated) =
            truncate_chars(String::from_utf8_lossy(&body).into_owned(), self.max_content_chars);

        Ok(PageContent {
            url: url.to_string(),
            effective_url,
            status,
            content_type: parsed.content_type,
            body,
            truncated,
        })
    }
}

impl ContentFetcher for CurlFetcher {
    fn fetch(&self, url: &str) -> Result<PageContent, FetchError> {
        tracing::debug!("fetching {}", url);
        let page = self.perform(url).map_err(|source| FetchError::Curl {
            url: url.to_string(),
            source,
        })?;
        if !(200..300).contains(&page.status) {
            return Err(FetchError::Http {
                url: url.to_string(),
                status: page.status,
            });
        }
        tracing::info!(
            "fetched {} ({} chars{})",
            url,
            page.body.chars().count(),
            if page.truncated { ", truncated" } else { "" }
        );
        Ok(page)
    }
}

/// Cuts `text` to at most `max_chars` chars on a char boundary.
fn truncate_chars(mut text: String, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => {
            text.truncate(idx);
            (text, true)
        }
        None => (text, false),
    }
}
