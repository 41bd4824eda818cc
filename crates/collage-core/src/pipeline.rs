//! End-to-end run: resolve → fetch → extract → collect → decode → layout → render.
//!
//! Stages run strictly in sequence. The extraction directory, when not
//! supplied by the caller, is a temporary directory removed on every exit
//! path; decoded images are dropped as soon as the collage is written.

use crate::collector::{collect_images, decode_images};
use crate::compositor::{self, OutputFormat, DEFAULT_BACKGROUND};
use crate::config::CollageConfig;
use crate::error::{CollageError, Result};
use crate::fetch::{self, HttpOptions};
use crate::layout::{resize_all, sizes_of, LayoutConfig, LayoutPlan};
use crate::resolver::DirectLinkResolver;
use image::Rgb;
use std::path::{Path, PathBuf};

/// File stem used when no output path is given.
pub const DEFAULT_OUTPUT_STEM: &str = "Result";

/// Everything needed to turn a set of images into a collage file.
#[derive(Debug, Clone)]
pub struct CollageJob {
    pub layout: LayoutConfig,
    pub background: Rgb<u8>,
    pub output: PathBuf,
    pub format: OutputFormat,
}

impl Default for CollageJob {
    fn default() -> Self {
        let format = OutputFormat::default();
        Self {
            layout: LayoutConfig::default(),
            background: DEFAULT_BACKGROUND,
            output: PathBuf::from(format!("{}.{}", DEFAULT_OUTPUT_STEM, format.extension())),
            format,
        }
    }
}

impl CollageJob {
    /// Builds a job from config; the output path is resolved against `cwd`.
    pub fn from_config(cfg: &CollageConfig, cwd: &Path) -> Result<Self> {
        let layout = cfg.layout.layout_config();
        layout.validate()?;
        let (output, format) = resolve_output(
            cfg.output.path.as_deref(),
            cfg.output.output_format()?,
            cfg.output.jpeg_quality,
        )?;
        Ok(Self {
            layout,
            background: Rgb(cfg.layout.background),
            output: cwd.join(output),
            format,
        })
    }
}

/// Reconciles an optional output path with an optional explicit format.
///
/// - neither: `Result.jpg`
/// - format only: `Result.<ext>`
/// - path only: format inferred from its extension, JPEG if unrecognised
/// - both: the extension, if it names a known container, must agree
pub fn resolve_output(
    path: Option<&Path>,
    format: Option<OutputFormat>,
    jpeg_quality: u8,
) -> Result<(PathBuf, OutputFormat)> {
    match (path, format) {
        (None, format) => {
            let format = match format {
                Some(f) => f,
                None => OutputFormat::from_name(Default::default(), jpeg_quality)?,
            };
            let name = format!("{}.{}", DEFAULT_OUTPUT_STEM, format.extension());
            Ok((PathBuf::from(name), format))
        }
        (Some(path), None) => {
            let format = match OutputFormat::from_path(path, jpeg_quality) {
                Some(f) => f?,
                None => OutputFormat::from_name(Default::default(), jpeg_quality)?,
            };
            Ok((path.to_path_buf(), format))
        }
        (Some(path), Some(format)) => {
            if let Some(inferred) = OutputFormat::from_path(path, jpeg_quality) {
                if inferred?.name() != format.name() {
                    return Err(CollageError::InvalidConfig(format!(
                        "output {} does not match format {:?}",
                        path.display(),
                        format.name()
                    )));
                }
            }
            Ok((path.to_path_buf(), format))
        }
    }
}

/// Drops the job's own output file from `paths`, so a collage written into
/// the scanned directory by an earlier run is not pasted into the next one.
fn without_output(mut paths: Vec<PathBuf>, output: &Path) -> Vec<PathBuf> {
    let Ok(output) = output.canonicalize() else {
        return paths;
    };
    paths.retain(|p| {
        let is_output = p.canonicalize().map(|c| c == output).unwrap_or(false);
        if is_output {
            tracing::info!(path = %p.display(), "skipping previous collage output");
        }
        !is_output
    });
    paths
}

/// Builds a collage from every image under `dir`. Returns the output path.
/// Nothing is written when no images are found.
pub fn collage_from_dir(dir: &Path, job: &CollageJob) -> Result<PathBuf> {
    job.layout.validate()?;

    let paths = without_output(collect_images(dir)?, &job.output);
    if paths.is_empty() {
        return Err(CollageError::EmptyInput);
    }

    let resized = {
        let decoded = decode_images(&paths)?;
        resize_all(&decoded, job.layout.cell_size)?
    };
    let plan = LayoutPlan::compute(&sizes_of(&resized), &job.layout)?;
    tracing::info!(
        images = resized.len(),
        rows = plan.rows,
        width = plan.canvas.width,
        height = plan.canvas.height,
        "rendering collage"
    );
    compositor::render(&resized, &plan, job.background, &job.output, job.format)?;
    Ok(job.output.clone())
}

/// Full run from a share link. Extracts into `extract_dir` when given
/// (contents are kept), otherwise into a temporary directory under the
/// system temp dir.
pub fn collage_from_share(
    resolver: &dyn DirectLinkResolver,
    http: &HttpOptions,
    share_url: &str,
    extract_dir: Option<&Path>,
    job: &CollageJob,
) -> Result<PathBuf> {
    let scratch_root = std::env::temp_dir();
    collage_from_share_in(resolver, http, share_url, extract_dir, &scratch_root, job)
}

/// Like [`collage_from_share`], with the temporary `collage-*` extraction
/// directory created under `scratch_root`. It is removed on every exit path.
pub fn collage_from_share_in(
    resolver: &dyn DirectLinkResolver,
    http: &HttpOptions,
    share_url: &str,
    extract_dir: Option<&Path>,
    scratch_root: &Path,
    job: &CollageJob,
) -> Result<PathBuf> {
    job.layout.validate()?;
    let direct = resolver.direct_link(share_url)?;

    let scratch;
    let dest = match extract_dir {
        Some(dir) => dir,
        None => {
            scratch = tempfile::Builder::new()
                .prefix("collage-")
                .tempdir_in(scratch_root)
                .map_err(|e| CollageError::io(scratch_root, e))?;
            scratch.path()
        }
    };

    fetch::download_and_extract(&direct, dest, http)?;
    collage_from_dir(dest, job)
}
