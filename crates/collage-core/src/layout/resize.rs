//! Normalizes every image to the uniform cell size.

use super::Size;
use crate::error::{CollageError, Result};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

/// Bicubic, the usual default for photo downscaling.
const FILTER: FilterType = FilterType::CatmullRom;

/// Stretches each image to exactly `cell` (aspect ratio is not preserved).
/// Images already at `cell` are returned unchanged.
pub fn resize_all(images: &[DynamicImage], cell: Size) -> Result<Vec<DynamicImage>> {
    if images.is_empty() {
        return Err(CollageError::EmptyInput);
    }
    if cell.width == 0 || cell.height == 0 {
        return Err(CollageError::InvalidConfig(format!(
            "cell size must be non-zero, got {}x{}",
            cell.width, cell.height
        )));
    }

    Ok(images
        .iter()
        .map(|img| {
            if img.dimensions() == (cell.width, cell.height) {
                img.clone()
            } else {
                img.resize_exact(cell.width, cell.height, FILTER)
            }
        })
        .collect())
}

/// Sizes of a slice of images, in order.
pub fn sizes_of(images: &[DynamicImage]) -> Vec<Size> {
    images
        .iter()
        .map(|img| {
            let (w, h) = img.dimensions();
            Size::new(w, h)
        })
        .collect()
}
