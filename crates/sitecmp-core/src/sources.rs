//! URL source file: one URL per line, blank lines ignored.
//!
//! Loading never fails. A path that is not a regular file yields an empty
//! list, and so does a file that exists but cannot be read.

use anyhow::{Context, Result};
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Lines written to a freshly created source file.
pub const PLACEHOLDER_URLS: [&str; 2] = [
    "https://www.example.com",
    "https://www.wikipedia.org/wiki/Comparison_of_websites",
];

/// Reads trimmed, non-empty lines from `path` in file order. Duplicates are kept.
pub fn load_urls(path: &Path) -> Vec<String> {
    if !path.is_file() {
        tracing::debug!("source file {} not found; no URLs", path.display());
        return Vec::new();
    }
    let file = match fs::File::open(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!("cannot open source file {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    let mut urls = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                tracing::warn!("cannot read source file {}: {}", path.display(), e);
                return Vec::new();
            }
        };
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            urls.push(trimmed.to_string());
        }
    }
    tracing::debug!("loaded {} URLs from {}", urls.len(), path.display());
    urls
}

/// Creates `path` with [`PLACEHOLDER_URLS`] if it does not exist yet.
/// Returns true when the file was created; an existing file is left untouched.
pub fn ensure_sources_file(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
    }
    let mut contents = String::new();
    for url in PLACEHOLDER_URLS {
        contents.push_str(url);
        contents.push('\n');
    }
    fs::write(path, contents).with_context(|| format!("write {}", path.display()))?;
    tracing::info!("created sample source file at {}", path.display());
    Ok(true)
}
