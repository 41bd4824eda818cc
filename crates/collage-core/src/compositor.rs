//! Paints a [`LayoutPlan`] onto a canvas and writes it out.
//!
//! The encoded file is written next to its destination with a `.part`
//! suffix, then renamed into place, so a failed encode never leaves a
//! truncated collage at the output path.

use crate::config::FormatName;
use crate::error::{CollageError, Result};
use crate::layout::LayoutPlan;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::tiff::TiffEncoder;
use image::{ColorType, DynamicImage, ImageEncoder, Rgb, RgbImage};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Canvas fill when none is configured.
pub const DEFAULT_BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Output container with its format-specific options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Lossy JPEG at the given quality (1..=100).
    Jpeg { quality: u8 },
    Tiff,
    Png,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Jpeg { quality: 90 }
    }
}

impl OutputFormat {
    pub fn from_name(name: FormatName, jpeg_quality: u8) -> Result<Self> {
        Ok(match name {
            FormatName::Jpeg => {
                if !(1..=100).contains(&jpeg_quality) {
                    return Err(CollageError::InvalidConfig(format!(
                        "JPEG quality must be within 1..=100, got {}",
                        jpeg_quality
                    )));
                }
                OutputFormat::Jpeg {
                    quality: jpeg_quality,
                }
            }
            FormatName::Tiff => OutputFormat::Tiff,
            FormatName::Png => OutputFormat::Png,
        })
    }

    /// Infers the container from a file extension (case-insensitive).
    pub fn from_path(path: &Path, jpeg_quality: u8) -> Option<Result<Self>> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        let name = match ext.as_str() {
            "jpg" | "jpeg" => FormatName::Jpeg,
            "tif" | "tiff" => FormatName::Tiff,
            "png" => FormatName::Png,
            _ => return None,
        };
        Some(Self::from_name(name, jpeg_quality))
    }

    pub fn name(&self) -> FormatName {
        match self {
            OutputFormat::Jpeg { .. } => FormatName::Jpeg,
            OutputFormat::Tiff => FormatName::Tiff,
            OutputFormat::Png => FormatName::Png,
        }
    }

    /// Canonical file extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg { .. } => "jpg",
            OutputFormat::Tiff => "tif",
            OutputFormat::Png => "png",
        }
    }
}

/// Allocates the canvas and pastes each image at its placement, in order.
pub fn compose(images: &[DynamicImage], plan: &LayoutPlan, background: Rgb<u8>) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(plan.canvas.width, plan.canvas.height, background);
    for entry in &plan.placements {
        let Some(img) = images.get(entry.image_index) else {
            tracing::warn!(index = entry.image_index, "placement without image, skipped");
            continue;
        };
        tracing::debug!(
            index = entry.image_index,
            row = entry.row,
            column = entry.column,
            x = entry.x,
            y = entry.y,
            "paste"
        );
        let rgb = img.to_rgb8();
        image::imageops::replace(&mut canvas, &rgb, i64::from(entry.x), i64::from(entry.y));
    }
    canvas
}

fn part_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(".part");
    PathBuf::from(o)
}

fn encode(
    canvas: &RgbImage,
    format: OutputFormat,
    out: &mut BufWriter<File>,
) -> image::ImageResult<()> {
    let (w, h) = canvas.dimensions();
    let buf = canvas.as_raw();
    match format {
        OutputFormat::Jpeg { quality } => JpegEncoder::new_with_quality(&mut *out, quality)
            .write_image(buf, w, h, ColorType::Rgb8),
        OutputFormat::Png => PngEncoder::new(&mut *out).write_image(buf, w, h, ColorType::Rgb8),
        OutputFormat::Tiff => TiffEncoder::new(&mut *out).write_image(buf, w, h, ColorType::Rgb8),
    }
}

/// Encodes `canvas` as `format` and atomically places it at `path`.
pub fn write_output(canvas: &RgbImage, path: &Path, format: OutputFormat) -> Result<()> {
    let temp = part_path(path);
    let file = File::create(&temp).map_err(|e| CollageError::io(&temp, e))?;
    let mut out = BufWriter::new(file);

    let written = encode(canvas, format, &mut out)
        .map_err(|source| CollageError::Encode {
            path: path.to_path_buf(),
            source,
        })
        .and_then(|()| {
            out.flush().map_err(|e| CollageError::io(&temp, e))?;
            out.get_ref().sync_all().map_err(|e| CollageError::io(&temp, e))
        });
    drop(out);

    if let Err(e) = written {
        let _ = fs::remove_file(&temp);
        return Err(e);
    }
    fs::rename(&temp, path).map_err(|e| {
        let _ = fs::remove_file(&temp);
        CollageError::io(path, e)
    })?;
    tracing::info!(
        path = %path.display(),
        width = canvas.width(),
        height = canvas.height(),
        "collage written"
    );
    Ok(())
}

/// Composes and writes the collage in one step.
pub fn render(
    images: &[DynamicImage],
    plan: &LayoutPlan,
    background: Rgb<u8>,
    path: &Path,
    format: OutputFormat,
) -> Result<()> {
    let canvas = compose(images, plan, background);
    write_output(&canvas, path, format)
}
