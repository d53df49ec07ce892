//! The complete rectangular raster.

use relink_core::BuildError;

/// An immutable `rows x cols` raster with row-major flat indexing.
///
/// Cell `(row, col)` has flat index `row * cols + col`. Cartesian
/// coordinates place each cell at its center, with `x` growing along
/// columns and `y` growing along rows (raster convention: row 0 is the
/// top of the image).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: u32,
    cols: u32,
}

impl Grid {
    /// Create a grid, rejecting empty dimensions and cell counts that do
    /// not fit the `u32` node space.
    pub fn new(rows: u32, cols: u32) -> Result<Self, BuildError> {
        if rows == 0 || cols == 0 {
            return Err(BuildError::EmptyGrid);
        }
        let cells = rows as u64 * cols as u64;
        if cells > u32::MAX as u64 {
            return Err(BuildError::DimensionTooLarge {
                name: "rows * cols",
                value: cells,
                max: u32::MAX as u64,
            });
        }
        Ok(Self { rows, cols })
    }

    /// Number of rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Flat index of `(row, col)`, or `None` when out of bounds.
    pub fn cell_index(&self, row: u32, col: u32) -> Option<u32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(row * self.cols + col)
    }

    /// `(row, col)` of a flat index, or `None` when out of bounds.
    pub fn coordinates(&self, cell: u32) -> Option<(u32, u32)> {
        if cell as usize >= self.cell_count() {
            return None;
        }
        Some((cell / self.cols, cell % self.cols))
    }

    /// Cartesian center `(x, y)` of a cell.
    pub fn cartesian(&self, cell: u32) -> Option<(f64, f64)> {
        let (row, col) = self.coordinates(cell)?;
        Some((col as f64 + 0.5, row as f64 + 0.5))
    }
}
