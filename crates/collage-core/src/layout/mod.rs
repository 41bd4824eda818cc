//! Fixed-column grid layout.
//!
//! Pure geometry: given the size of every (already resized) image and a
//! [`LayoutConfig`], computes the canvas dimensions and the top-left pixel of
//! every image. Nothing here touches pixels except [`resize_all`].
//!
//! Grid model, with `m` the margin and `cw`/`ch` the cell size:
//!
//! ```text
//! canvas_width  = columns * (cw + m) + m
//! canvas_height = rows    * (ch + m) + m      rows = ceil(n / columns)
//! cell (r, c) top-left = (m + c * (cw + m), m + r * (ch + m))
//! ```

mod grid;
mod resize;

pub use grid::{compute_canvas, compute_placements};
pub use resize::{resize_all, sizes_of};

use crate::error::{CollageError, Result};

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Caller-supplied grid parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Every image is stretched to exactly this size before placement.
    pub cell_size: Size,
    /// Images per row.
    pub columns: u32,
    /// Gap between cells and around the canvas border.
    pub margin: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            cell_size: Size::new(800, 800),
            columns: 7,
            margin: 100,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<()> {
        validate_columns(self.columns)?;
        if self.cell_size.width == 0 || self.cell_size.height == 0 {
            return Err(CollageError::InvalidConfig(format!(
                "cell size must be non-zero, got {}x{}",
                self.cell_size.width, self.cell_size.height
            )));
        }
        Ok(())
    }
}

pub(crate) fn validate_columns(columns: u32) -> Result<()> {
    if columns == 0 {
        return Err(CollageError::InvalidConfig(
            "columns must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Where one image goes on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementEntry {
    pub image_index: usize,
    pub row: u32,
    pub column: u32,
    /// Top-left x of the pasted image (cell origin plus centering offset).
    pub x: u32,
    /// Top-left y of the pasted image (cell origin plus centering offset).
    pub y: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSpec {
    pub width: u32,
    pub height: u32,
}

/// Full layout for one collage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPlan {
    pub canvas: CanvasSpec,
    pub rows: u32,
    /// Cell size actually used: the per-axis maximum over all images.
    pub cell: Size,
    pub placements: Vec<PlacementEntry>,
}

impl LayoutPlan {
    /// Lays out images of the given sizes. Images smaller than the largest
    /// one are centered inside their cell (offset truncated toward zero).
    pub fn compute(sizes: &[Size], config: &LayoutConfig) -> Result<Self> {
        if sizes.is_empty() {
            return Err(CollageError::EmptyInput);
        }
        validate_columns(config.columns)?;

        let mut plan = Self::cells(sizes.len(), max_size(sizes), config)?;
        let cell = plan.cell;
        for (entry, size) in plan.placements.iter_mut().zip(sizes) {
            entry.x += (cell.width - size.width) / 2;
            entry.y += (cell.height - size.height) / 2;
        }
        Ok(plan)
    }

    /// Lays out `count` images that all have the configured cell size.
    /// The canvas is checked for overflow before any placement is allocated.
    pub fn uniform(count: usize, config: &LayoutConfig) -> Result<Self> {
        if count == 0 {
            return Err(CollageError::EmptyInput);
        }
        config.validate()?;
        Self::cells(count, config.cell_size, config)
    }

    fn cells(count: usize, cell: Size, config: &LayoutConfig) -> Result<Self> {
        let canvas = grid::canvas_for_count(count, config.columns, cell, config.margin)?;
        let placements = compute_placements(
            count,
            config.columns,
            cell.width,
            cell.height,
            config.margin,
        )?;

        let rows = placements.last().map(|p| p.row + 1).unwrap_or(0);
        tracing::debug!(
            images = count,
            rows,
            canvas_width = canvas.width,
            canvas_height = canvas.height,
            "layout computed"
        );

        Ok(Self {
            canvas,
            rows,
            cell,
            placements,
        })
    }
}

pub(crate) fn max_size(sizes: &[Size]) -> Size {
    sizes.iter().fold(Size::new(0, 0), |acc, s| {
        Size::new(acc.width.max(s.width), acc.height.max(s.height))
    })
}
