//! Report file output and digest.
//!
//! The report file is overwritten on every run with exactly the report text.
//! The SHA-256 of what was written goes to the log so two runs can be
//! compared without diffing.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// What was written by [`write_report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub path: PathBuf,
    pub bytes: usize,
    /// Lowercase hex SHA-256 of the report text.
    pub sha256: String,
}

/// SHA-256 of `text` as lowercase hex.
pub fn sha256_hex(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Overwrites `path` with `report` (no trailing newline added).
pub fn write_report(path: &Path, report: &str) -> Result<ReportSummary> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
    }
    fs::write(path, report).with_context(|| format!("write report {}", path.display()))?;

    let summary = ReportSummary {
        path: path.to_path_buf(),
        bytes: report.len(),
        sha256: sha256_hex(report),
    };
    tracing::info!(
        "wrote report {} ({} bytes, sha256 {})",
        summary.path.display(),
        summary.bytes,
        summary.sha256
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_known_values() {
        assert_eq!(
            sha256_hex(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            sha256_hex("hello\n"),
            "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03"
        );
    }

    #[test]
    fn write_report_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comparison_report.txt");
        fs::write(&path, "an older and much longer report").unwrap();

        let s = write_report(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(s.bytes, 3);
        assert_eq!(s.path, path);
        assert_eq!(s.sha256, sha256_hex("new"));
    }

    #[test]
    fn write_report_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("r.txt");
        write_report(&path, "x").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "x");
    }
}
