/// Per-frame moving/still classification of every full block.
///
/// Stored row-major: `columns = floor(width / block_size)`,
/// `rows = floor(height / block_size)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockGrid {
    columns: usize,
    rows: usize,
    block_size: u32,
    cells: Vec<bool>,
}

impl BlockGrid {
    /// All-still grid of the given size.
    pub fn new(columns: usize, rows: usize, block_size: u32) -> Self {
        Self {
            columns,
            rows,
            block_size,
            cells: vec![false; columns * rows],
        }
    }

    /// Grid sized for a `width x height` frame; trailing partial blocks are dropped.
    pub fn for_frame(width: u32, height: u32, block_size: u32) -> Self {
        Self::new(
            (width / block_size) as usize,
            (height / block_size) as usize,
            block_size,
        )
    }

    /// Builds a grid from row slices, mostly useful for tests and tooling.
    ///
    /// Rows shorter than the first row are padded with `false`.
    pub fn from_rows(rows: &[&[bool]], block_size: u32) -> Self {
        let columns = rows.first().map_or(0, |r| r.len());
        let mut grid = Self::new(columns, rows.len(), block_size);
        for (row, cells) in rows.iter().enumerate() {
            for (col, &moving) in cells.iter().take(columns).enumerate() {
                grid.set(col, row, moving);
            }
        }
        grid
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    pub fn is_empty(&self) -> bool {
        self.columns == 0 || self.rows == 0
    }

    /// Out-of-range coordinates read as still.
    pub fn get(&self, col: usize, row: usize) -> bool {
        col < self.columns && row < self.rows && self.cells[row * self.columns + col]
    }

    pub fn set(&mut self, col: usize, row: usize, moving: bool) {
        assert!(
            col < self.columns && row < self.rows,
            "block ({col}, {row}) outside {}x{} grid",
            self.columns,
            self.rows
        );
        self.cells[row * self.columns + col] = moving;
    }

    pub fn moving_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Coordinates `(col, row)` of moving blocks in raster order.
    pub fn moving_blocks(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let columns = self.columns;
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &moving)| moving)
            .map(move |(i, _)| (i % columns, i / columns))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::exact(20, 20, 10, 2, 2)]
    #[case::truncates_partial_blocks(25, 19, 10, 2, 1)]
    #[case::smaller_than_block(9, 9, 10, 0, 0)]
    #[case::unit_blocks(3, 2, 1, 3, 2)]
    fn test_for_frame_uses_floor_division(
        #[case] width: u32,
        #[case] height: u32,
        #[case] block_size: u32,
        #[case] columns: usize,
        #[case] rows: usize,
    ) {
        let grid = BlockGrid::for_frame(width, height, block_size);
        assert_eq!(grid.columns(), columns);
        assert_eq!(grid.rows(), rows);
        assert_eq!(grid.moving_count(), 0);
    }

    #[test]
    fn test_set_and_get() {
        let mut grid = BlockGrid::new(3, 2, 10);
        grid.set(2, 1, true);
        assert!(grid.get(2, 1));
        assert!(!grid.get(1, 2));
        assert!(!grid.get(5, 5));
        assert_eq!(grid.moving_count(), 1);
    }

    #[test]
    #[should_panic(expected = "outside 2x2 grid")]
    fn test_set_out_of_range_panics() {
        let mut grid = BlockGrid::new(2, 2, 10);
        grid.set(2, 0, true);
    }

    #[test]
    fn test_from_rows_and_moving_blocks_in_raster_order() {
        let grid = BlockGrid::from_rows(&[&[false, true, false], &[true, false, true]], 4);
        assert_eq!(grid.columns(), 3);
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.block_size(), 4);
        let blocks: Vec<_> = grid.moving_blocks().collect();
        assert_eq!(blocks, vec![(1, 0), (0, 1), (2, 1)]);
    }

    #[test]
    fn test_empty_grid() {
        assert!(BlockGrid::new(0, 4, 10).is_empty());
        assert!(BlockGrid::new(4, 0, 10).is_empty());
        assert!(!BlockGrid::new(1, 1, 10).is_empty());
        assert!(BlockGrid::from_rows(&[], 10).is_empty());
    }
}
