//! `collage fetch [url]` – share link to collage.

use anyhow::{Context, Result};
use collage_core::config::CollageConfig;
use collage_core::fetch::HttpOptions;
use collage_core::pipeline::{self, CollageJob};
use collage_core::resolver::DiskApiResolver;
use std::io::{self, BufRead, Write};
use std::path::Path;

const PROMPT: &str = "Enter the Yandex.Disk URL: ";

fn prompt_for_url() -> Result<String> {
    print!("{}", PROMPT);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let url = line.trim().to_string();
    if url.is_empty() {
        anyhow::bail!("no share link given");
    }
    Ok(url)
}

pub fn run_fetch(
    cfg: &CollageConfig,
    url: Option<String>,
    extract_dir: Option<&Path>,
) -> Result<()> {
    // Validate configuration before asking the user for anything.
    let resolver = DiskApiResolver::new(&cfg.api)?;
    let job = CollageJob::from_config(cfg, &std::env::current_dir()?)?;

    let url = match url {
        Some(u) => u,
        None => prompt_for_url()?,
    };
    let out = pipeline::collage_from_share(
        &resolver,
        &HttpOptions::from(&cfg.api),
        &url,
        extract_dir,
        &job,
    )
    .with_context(|| format!("collage from {}", url.trim()))?;
    println!("Collage written to {}", out.display());
    Ok(())
}
