//! Two-step pipeline: extract URLs, then compare them.
//!
//! Step B only starts once step A has returned the complete list.

use anyhow::Result;
use std::path::Path;

use crate::compare::ComparisonCapability;
use crate::prompt::{self, CONTENT_ANALYST, URL_EXTRACTOR};
use crate::sources;

/// Step A: the URL list from the source file.
pub fn extract_urls(path: &Path) -> Vec<String> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    tracing::info!(
        role = URL_EXTRACTOR.name,
        "{} Expecting: {}",
        prompt::extract_task(&file_name),
        prompt::EXTRACT_EXPECTED_OUTPUT
    );
    sources::load_urls(path)
}

/// Step B: hand the whole URL list to the comparison capability.
pub fn compare_urls<C>(urls: &[String], capability: &C) -> Result<String>
where
    C: ComparisonCapability + ?Sized,
{
    tracing::info!(role = CONTENT_ANALYST.name, "comparing {} URLs", urls.len());
    capability.compare(urls)
}

/// Runs step A then step B and returns the report text.
pub fn run_pipeline<C>(sources_path: &Path, capability: &C) -> Result<String>
where
    C: ComparisonCapability + ?Sized,
{
    let urls = extract_urls(sources_path);
    compare_urls(&urls, capability)
}
