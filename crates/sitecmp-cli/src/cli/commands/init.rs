//! `sitecmp init` – create the source file with sample URLs if it is missing.

use anyhow::Result;
use sitecmp_core::driver::{self, RunPaths};
use std::io;

pub fn run_init(paths: &RunPaths) -> Result<()> {
    let stdout = io::stdout();
    let created = driver::prepare(paths, &mut stdout.lock())?;
    if !created {
        println!("{} already exists.", paths.sources.display());
    }
    Ok(())
}
