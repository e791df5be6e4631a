//! `sitecmp [run]` – compare the URLs in the source file and save the report.

use anyhow::{Context, Result};
use sitecmp_core::compare::SiteComparator;
use sitecmp_core::config::SiteCmpConfig;
use sitecmp_core::driver::{self, RunPaths};
use sitecmp_core::fetch::CurlFetcher;
use sitecmp_core::llm::OpenAiChat;
use std::io;

pub async fn run_compare(cfg: &SiteCmpConfig, paths: RunPaths) -> Result<()> {
    // Runs before the API-key check so a first run without credentials still
    // leaves the sample source file; the call inside driver::run is then a no-op.
    driver::prepare(&paths, &mut io::stdout().lock())?;

    let model = OpenAiChat::from_env(&cfg.llm)?;
    let comparator = SiteComparator::new(CurlFetcher::new(&cfg.fetch), model, cfg.focus.clone())
        .with_fetch_error_policy(cfg.compare.on_fetch_error);

    let summary = tokio::task::spawn_blocking(move || {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        driver::run(&paths, &comparator, &mut out)
    })
    .await
    .context("comparison task join")??;

    tracing::info!(
        "run complete: {} ({} bytes, sha256 {})",
        summary.path.display(),
        summary.bytes,
        summary.sha256
    );
    Ok(())
}
