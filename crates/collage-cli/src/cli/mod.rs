//! CLI for the collage builder.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use collage_core::config::{self, CollageConfig, FormatName};
use std::path::PathBuf;

use commands::{run_fetch, run_local, run_plan};

/// Top-level CLI for the collage builder.
#[derive(Debug, Parser)]
#[command(name = "collage")]
#[command(about = "Build a grid collage from the images in a shared cloud archive", long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of ~/.config/collage/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download a shared archive and build a collage from its images.
    Fetch {
        /// Public share link. Prompted for on stdin when omitted.
        url: Option<String>,

        /// API base URL (overrides YANDEX_API_URL and the config file).
        #[arg(long, value_name = "URL")]
        api_url: Option<String>,

        /// Extract the archive here and keep it (default: a temporary directory).
        #[arg(long, value_name = "DIR")]
        extract_dir: Option<PathBuf>,

        #[command(flatten)]
        layout: LayoutArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Build a collage from images already on disk.
    Local {
        /// Directory to search recursively for images.
        dir: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the canvas size and placements for N images without rendering.
    Plan {
        /// Number of images to lay out.
        #[arg(long, value_name = "N")]
        count: usize,

        #[command(flatten)]
        layout: LayoutArgs,
    },
}

/// Grid overrides; unset flags keep the configured value.
#[derive(Debug, Clone, Default, Args)]
pub struct LayoutArgs {
    /// Images per row.
    #[arg(long)]
    pub columns: Option<u32>,
    /// Cell width in pixels.
    #[arg(long)]
    pub cell_width: Option<u32>,
    /// Cell height in pixels.
    #[arg(long)]
    pub cell_height: Option<u32>,
    /// Gap between cells and around the border, in pixels.
    #[arg(long)]
    pub margin: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Jpeg,
    Tiff,
    Png,
}

impl From<FormatArg> for FormatName {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Jpeg => FormatName::Jpeg,
            FormatArg::Tiff => FormatName::Tiff,
            FormatArg::Png => FormatName::Png,
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct OutputArgs {
    /// Output file (default: Result.<ext> in the current directory).
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,
    /// Output container; inferred from --output when omitted.
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,
    /// JPEG quality, 1-100.
    #[arg(long, value_name = "Q")]
    pub quality: Option<u8>,
}

impl LayoutArgs {
    pub fn apply(&self, cfg: &mut CollageConfig) {
        let layout = &mut cfg.layout;
        if let Some(v) = self.columns {
            layout.columns = v;
        }
        if let Some(v) = self.cell_width {
            layout.cell_width = v;
        }
        if let Some(v) = self.cell_height {
            layout.cell_height = v;
        }
        if let Some(v) = self.margin {
            layout.margin = v;
        }
    }
}

impl OutputArgs {
    pub fn apply(&self, cfg: &mut CollageConfig) {
        let output = &mut cfg.output;
        if let Some(p) = &self.output {
            output.path = Some(p.clone());
            // A path on the command line re-derives the format unless one is given too.
            output.format = None;
        }
        if let Some(f) = self.format {
            output.format = Some(f.into());
        }
        if let Some(q) = self.quality {
            output.jpeg_quality = q;
        }
    }
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match &cli.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_init()?,
        }
        .with_env_overrides();
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Fetch {
                url,
                api_url,
                extract_dir,
                layout,
                output,
            } => {
                let mut cfg = cfg.with_api_url(api_url);
                layout.apply(&mut cfg);
                output.apply(&mut cfg);
                run_fetch(&cfg, url, extract_dir.as_deref())?;
            }
            CliCommand::Local {
                dir,
                layout,
                output,
            } => {
                let mut cfg = cfg;
                layout.apply(&mut cfg);
                output.apply(&mut cfg);
                run_local(&cfg, &dir)?;
            }
            CliCommand::Plan { count, layout } => {
                let mut cfg = cfg;
                layout.apply(&mut cfg);
                run_plan(&cfg, count)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
