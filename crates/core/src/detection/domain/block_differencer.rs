use ndarray::{s, ArrayView1, ArrayView3, Axis};

use crate::shared::block_grid::BlockGrid;
use crate::shared::error::MotionError;
use crate::shared::frame::Frame;
use crate::shared::motion_config::validate_parameters;

/// Classifies every full `block_size x block_size` tile of `current` as
/// moving or still relative to the same tile of `previous`.
///
/// A tile is moving when at least one of its pixels has an averaged RGB
/// difference strictly greater than `threshold`; alpha is ignored. Pixels
/// past the last full tile on the right and bottom edges are never read.
/// Without a previous frame every tile is still.
pub fn compute_motion_grid(
    current: &Frame,
    previous: Option<&Frame>,
    block_size: u32,
    threshold: f64,
) -> Result<BlockGrid, MotionError> {
    validate_parameters(block_size, threshold)?;

    let cur = current.as_ndarray()?;
    let mut grid = BlockGrid::for_frame(current.width(), current.height(), block_size);

    let Some(previous) = previous else {
        return Ok(grid);
    };
    ensure_same_dimensions(current, previous)?;
    let prev = previous.as_ndarray()?;

    let bs = block_size as usize;
    for row in 0..grid.rows() {
        let y0 = row * bs;
        for col in 0..grid.columns() {
            let x0 = col * bs;
            let cur_block = cur.slice(s![y0..y0 + bs, x0..x0 + bs, ..]);
            let prev_block = prev.slice(s![y0..y0 + bs, x0..x0 + bs, ..]);
            if block_exceeds(cur_block, prev_block, threshold) {
                grid.set(col, row, true);
            }
        }
    }

    Ok(grid)
}

fn ensure_same_dimensions(current: &Frame, previous: &Frame) -> Result<(), MotionError> {
    if current.width() != previous.width() || current.height() != previous.height() {
        return Err(MotionError::DimensionMismatch {
            expected: previous.declared_geometry(),
            actual: current.geometry(),
        });
    }
    Ok(())
}

/// Scans the block in raster order and stops at the first pixel over threshold.
fn block_exceeds(current: ArrayView3<'_, u8>, previous: ArrayView3<'_, u8>, threshold: f64) -> bool {
    current
        .lanes(Axis(2))
        .into_iter()
        .zip(previous.lanes(Axis(2)))
        .any(|(c, p)| pixel_difference(c, p) > threshold)
}

/// Mean absolute difference over the red, green and blue samples.
fn pixel_difference(current: ArrayView1<'_, u8>, previous: ArrayView1<'_, u8>) -> f64 {
    let sum: u32 = current
        .iter()
        .zip(previous.iter())
        .take(3)
        .map(|(&c, &p)| u32::from(c.abs_diff(p)))
        .sum();
    f64::from(sum) / 3.0
}
