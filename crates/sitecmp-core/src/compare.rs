//! Comparison capability: turn an ordered URL list into one text report.
//!
//! [`SiteComparator`] fetches every URL in order, then asks a chat model for
//! a single comparative report over all fetched pages.

use anyhow::{Context, Result};
use std::error::Error;
use std::fmt::Write as _;

use crate::config::FetchErrorPolicy;
use crate::fetch::{ContentFetcher, FetchError, PageContent};
use crate::llm::{ChatMessage, ChatModel};
use crate::prompt::{self, CONTENT_ANALYST};

/// Report returned when the source file yielded no URLs.
pub const NO_URLS_REPORT: &str = "No URLs were supplied, so there is nothing to compare.";

/// Black-box capability: ordered URLs in, one text report out.
pub trait ComparisonCapability {
    fn compare(&self, urls: &[String]) -> Result<String>;
}

/// Outcome of fetching one URL under the skip policy.
#[derive(Debug)]
enum Fetched {
    Page(PageContent),
    Unavailable { url: String, reason: String },
}

/// Fetch-then-synthesize comparator.
pub struct SiteComparator<F, M> {
    fetcher: F,
    model: M,
    focus: String,
    on_fetch_error: FetchErrorPolicy,
}

impl<F: ContentFetcher, M: ChatModel> SiteComparator<F, M> {
    pub fn new(fetcher: F, model: M, focus: impl Into<String>) -> Self {
        Self {
            fetcher,
            model,
            focus: focus.into(),
            on_fetch_error: FetchErrorPolicy::default(),
        }
    }

    pub fn with_fetch_error_policy(mut self, policy: FetchErrorPolicy) -> Self {
        self.on_fetch_error = policy;
        self
    }

    fn fetch_all(&self, urls: &[String]) -> Result<Vec<Fetched>> {
        let mut out = Vec::with_capacity(urls.len());
        for url in urls {
            match self.fetcher.fetch(url) {
                Ok(page) => out.push(Fetched::Page(page)),
                Err(e) => match self.on_fetch_error {
                    FetchErrorPolicy::Abort => return Err(e.into()),
                    FetchErrorPolicy::Skip => {
                        tracing::warn!("skipping {}: {}", url, error_chain(&e));
                        out.push(Fetched::Unavailable {
                            url: url.clone(),
                            reason: error_chain(&e),
                        });
                    }
                },
            }
        }
        if !out.is_empty() && out.iter().all(|f| matches!(f, Fetched::Unavailable { .. })) {
            anyhow::bail!("none of the {} URLs could be fetched", out.len());
        }
        Ok(out)
    }
}

impl<F: ContentFetcher, M: ChatModel> ComparisonCapability for SiteComparator<F, M> {
    fn compare(&self, urls: &[String]) -> Result<String> {
        if urls.is_empty() {
            tracing::warn!("no URLs to compare");
            return Ok(NO_URLS_REPORT.to_string());
        }

        let fetched = self.fetch_all(urls)?;
        let messages = vec![
            ChatMessage::system(CONTENT_ANALYST.system_prompt()),
            ChatMessage::user(build_user_prompt(&self.focus, &fetched)),
        ];

        tracing::info!(
            "asking {} to compare {} pages",
            self.model.name(),
            fetched.len()
        );
        self.model
            .complete(&messages)
            .with_context(|| format!("comparison by {} failed", self.model.name()))
    }
}

fn error_chain(e: &FetchError) -> String {
    let mut s = e.to_string();
    let mut source = e.source();
    while let Some(inner) = source {
        let _ = write!(s, ": {}", inner);
        source = inner.source();
    }
    s
}

/// Task text followed by one delimited section per URL, in input order.
fn build_user_prompt(focus: &str, fetched: &[Fetched]) -> String {
    let mut p = prompt::compare_task(focus);
    let _ = write!(
        p,
        "\n\nExpected output: {}\n",
        prompt::COMPARE_EXPECTED_OUTPUT
    );
    for (i, f) in fetched.iter().enumerate() {
        match f {
            Fetched::Page(page) => {
                let _ = write!(p, "\n=== Source {}: {} ===\n", i + 1, page.url);
                if page.effective_url != page.url {
                    let _ = writeln!(p, "(redirected to {})", page.effective_url);
                }
                if let Some(ct) = &page.content_type {
                    let _ = writeln!(p, "Content-Type: {}", ct);
                }
                p.push_str(&page.body);
                if page.truncated {
                    p.push_str("\n[content truncated]");
                }
                p.push('\n');
            }
            Fetched::Unavailable { url, reason } => {
                let _ = write!(
                    p,
                    "\n=== Source {}: {} ===\n[unavailable: {}]\n",
                    i + 1,
                    url,
                    reason
                );
            }
        }
    }
    p
}
