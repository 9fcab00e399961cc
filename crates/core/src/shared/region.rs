use serde::{Deserialize, Serialize};

/// Axis-aligned motion rectangle in pixel coordinates.
///
/// Always covers whole blocks: the bounding box of one connected component of
/// moving blocks, scaled back up by the block size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds the pixel rectangle spanning the inclusive block range
    /// `[min_col..=max_col] x [min_row..=max_row]`.
    pub fn from_block_span(
        min_col: usize,
        min_row: usize,
        max_col: usize,
        max_row: usize,
        block_size: u32,
    ) -> Self {
        let bs = block_size as usize;
        Self {
            x: (min_col * bs) as u32,
            y: (min_row * bs) as u32,
            width: ((max_col - min_col + 1) * bs) as u32,
            height: ((max_row - min_row + 1) * bs) as u32,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}
