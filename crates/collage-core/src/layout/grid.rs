//! Canvas size and cell origins for the fixed-column grid.

use super::{max_size, validate_columns, CanvasSpec, PlacementEntry, Size};
use crate::error::{CollageError, Result};

fn overflow() -> CollageError {
    CollageError::InvalidConfig("canvas dimensions overflow u32".to_string())
}

/// `count * (cell + margin) + margin`, checked.
fn span(count: u32, cell: u32, margin: u32) -> Result<u32> {
    cell.checked_add(margin)
        .and_then(|stride| stride.checked_mul(count))
        .and_then(|v| v.checked_add(margin))
        .ok_or_else(overflow)
}

/// Canvas that fits `ceil(n / columns)` full rows of the largest image size,
/// with a `margin` border on all four sides.
pub fn compute_canvas(sizes: &[Size], columns: u32, margin: u32) -> Result<CanvasSpec> {
    if sizes.is_empty() {
        return Err(CollageError::EmptyInput);
    }
    validate_columns(columns)?;

    canvas_for_count(sizes.len(), columns, max_size(sizes), margin)
}

/// Canvas for `n` cells of size `cell`. Callers check `n > 0` and `columns > 0`.
pub(crate) fn canvas_for_count(
    n: usize,
    columns: u32,
    cell: Size,
    margin: u32,
) -> Result<CanvasSpec> {
    let n = u32::try_from(n).map_err(|_| overflow())?;
    let rows = n.div_ceil(columns);

    Ok(CanvasSpec {
        width: span(columns, cell.width, margin)?,
        height: span(rows, cell.height, margin)?,
    })
}

/// Cell origins for `n` images in row-major order. Coordinates carry no
/// centering offset; see [`super::LayoutPlan::compute`] for that.
pub fn compute_placements(
    n: usize,
    columns: u32,
    cell_w: u32,
    cell_h: u32,
    margin: u32,
) -> Result<Vec<PlacementEntry>> {
    if n == 0 {
        return Err(CollageError::EmptyInput);
    }
    validate_columns(columns)?;
    let count = u32::try_from(n).map_err(|_| overflow())?;
    // The last cell's far edge must fit too, or coordinates would wrap.
    span(count.div_ceil(columns), cell_h, margin)?;
    span(columns, cell_w, margin)?;

    Ok((0..count)
        .map(|i| {
            let row = i / columns;
            let column = i % columns;
            PlacementEntry {
                image_index: i as usize,
                row,
                column,
                x: margin + column * (cell_w + margin),
                y: margin + row * (cell_h + margin),
            }
        })
        .collect())
}
