//! Run driver: make sure the source file exists, run the pipeline, print
//! the report and save it.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::compare::ComparisonCapability;
use crate::config::SiteCmpConfig;
use crate::orchestrator;
use crate::report::{self, ReportSummary};
use crate::sources;

pub const DEFAULT_SOURCES_FILE: &str = "sources.txt";
pub const DEFAULT_REPORT_FILE: &str = "comparison_report.txt";

/// Input and output file locations for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    pub sources: PathBuf,
    pub report: PathBuf,
}

impl RunPaths {
    /// Default file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            sources: dir.join(DEFAULT_SOURCES_FILE),
            report: dir.join(DEFAULT_REPORT_FILE),
        }
    }

    /// File names from `cfg` inside `dir`. Absolute names in the config win.
    pub fn from_config(dir: &Path, cfg: &SiteCmpConfig) -> Self {
        Self {
            sources: dir.join(&cfg.sources_file),
            report: dir.join(&cfg.report_file),
        }
    }
}

/// Directory holding the running executable.
pub fn program_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("locate current executable")?;
    let exe = exe.canonicalize().unwrap_or(exe);
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow::anyhow!("executable {} has no parent directory", exe.display()))
}

/// Creates the source file with placeholder URLs if missing. Returns true if created.
pub fn prepare(paths: &RunPaths, out: &mut impl Write) -> Result<bool> {
    let created = sources::ensure_sources_file(&paths.sources)?;
    if created {
        writeln!(
            out,
            "Created a sample {}. Please update it with the URLs you want to compare.",
            paths.sources.display()
        )?;
    }
    Ok(created)
}

/// Full run: prepare, extract, compare, print, save.
pub fn run<C>(paths: &RunPaths, capability: &C, out: &mut impl Write) -> Result<ReportSummary>
where
    C: ComparisonCapability + ?Sized,
{
    prepare(paths, out)?;

    let file_name = paths
        .sources
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| paths.sources.display().to_string());
    writeln!(
        out,
        "Starting the website content comparison process using {}...",
        file_name
    )?;
    out.flush()?;

    let report_text = orchestrator::run_pipeline(&paths.sources, capability)?;

    writeln!(out, "\nComparison Report:")?;
    writeln!(out, "{}", report_text)?;

    let summary = report::write_report(&paths.report, &report_text)?;
    writeln!(out, "\nReport saved to: {}", summary.path.display())?;
    writeln!(out, "\nProcess finished.")?;
    Ok(summary)
}
