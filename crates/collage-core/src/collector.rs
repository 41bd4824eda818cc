//! Finds and decodes the images in an extracted archive.

use crate::error::{CollageError, Result};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Extensions treated as images, compared case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Resource-fork directory some archivers add next to the real files.
const MACOS_METADATA_DIR: &str = "__MACOSX";

fn is_skipped(entry: &DirEntry) -> bool {
    // The walk root itself may be a temp dir with a dotted name.
    if entry.depth() == 0 {
        return false;
    }
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.') || s == MACOS_METADATA_DIR)
        .unwrap_or(false)
}

pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)))
        .unwrap_or(false)
}

/// Recursively lists image files under `dir`, sorted by path so the collage
/// order does not depend on the filesystem.
pub fn collect_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    let walker = WalkDir::new(dir).into_iter().filter_entry(|e| !is_skipped(e));
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory loop"));
            CollageError::io(path, source)
        })?;
        if entry.file_type().is_file() && has_image_extension(entry.path()) {
            images.push(entry.into_path());
        }
    }
    images.sort();
    tracing::info!(count = images.len(), dir = %dir.display(), "images collected");
    Ok(images)
}

/// Decodes every path; the first undecodable file aborts.
pub fn decode_images(paths: &[PathBuf]) -> Result<Vec<DynamicImage>> {
    paths
        .iter()
        .map(|path| {
            tracing::debug!(path = %path.display(), "decoding");
            image::open(path).map_err(|source| CollageError::Decode {
                path: path.clone(),
                source,
            })
        })
        .collect()
}
