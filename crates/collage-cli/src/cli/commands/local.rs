//! `collage local <dir>` – collage from images already on disk.

use anyhow::{Context, Result};
use collage_core::config::CollageConfig;
use collage_core::pipeline::{self, CollageJob};
use std::path::Path;

pub fn run_local(cfg: &CollageConfig, dir: &Path) -> Result<()> {
    let job = CollageJob::from_config(cfg, &std::env::current_dir()?)?;
    let out = pipeline::collage_from_dir(dir, &job)
        .with_context(|| format!("collage from {}", dir.display()))?;
    println!("Collage written to {}", out.display());
    Ok(())
}
