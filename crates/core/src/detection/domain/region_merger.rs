use crate::shared::block_grid::BlockGrid;
use crate::shared::error::MotionError;
use crate::shared::region::Region;

/// Von Neumann neighbourhood: right, left, down, up.
const NEIGHBOURS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Merges 4-connected moving blocks into pixel-space bounding rectangles.
///
/// Seeds are visited in raster order, so regions come out ordered by the
/// first cell of each component. Diagonal neighbours are never joined.
pub fn extract_regions(grid: &BlockGrid) -> Result<Vec<Region>, MotionError> {
    if grid.is_empty() {
        return Err(MotionError::EmptyGrid {
            columns: grid.columns(),
            rows: grid.rows(),
        });
    }

    let columns = grid.columns();
    let mut visited = vec![false; columns * grid.rows()];
    let mut stack: Vec<(usize, usize)> = Vec::new();
    let mut regions = Vec::new();

    for (col, row) in grid.moving_blocks() {
        if visited[row * columns + col] {
            continue;
        }
        visited[row * columns + col] = true;
        stack.push((col, row));
        let bounds = flood_component(grid, &mut visited, &mut stack);
        regions.push(bounds.into_region(grid.block_size()));
    }

    Ok(regions)
}

/// Inclusive block-coordinate bounding box of one component.
struct BlockBounds {
    min_col: usize,
    min_row: usize,
    max_col: usize,
    max_row: usize,
}

impl BlockBounds {
    fn empty() -> Self {
        Self {
            min_col: usize::MAX,
            min_row: usize::MAX,
            max_col: 0,
            max_row: 0,
        }
    }

    fn include(&mut self, col: usize, row: usize) {
        self.min_col = self.min_col.min(col);
        self.min_row = self.min_row.min(row);
        self.max_col = self.max_col.max(col);
        self.max_row = self.max_row.max(row);
    }

    fn into_region(self, block_size: u32) -> Region {
        Region::from_block_span(
            self.min_col,
            self.min_row,
            self.max_col,
            self.max_row,
            block_size,
        )
    }
}

/// Iterative depth-first fill from the cells already on `stack`.
fn flood_component(
    grid: &BlockGrid,
    visited: &mut [bool],
    stack: &mut Vec<(usize, usize)>,
) -> BlockBounds {
    let columns = grid.columns();
    let mut bounds = BlockBounds::empty();

    while let Some((col, row)) = stack.pop() {
        bounds.include(col, row);

        for (dc, dr) in NEIGHBOURS {
            let (Some(nc), Some(nr)) = (col.checked_add_signed(dc), row.checked_add_signed(dr))
            else {
                continue;
            };
            if !grid.get(nc, nr) {
                continue;
            }
            let idx = nr * columns + nc;
            if !visited[idx] {
                visited[idx] = true;
                stack.push((nc, nr));
            }
        }
    }

    bounds
}
