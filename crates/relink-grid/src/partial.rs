//! A grid minus a discard set.

use crate::grid::Grid;
use crate::neighborhood::Neighborhood;
use relink_core::BuildError;
use smallvec::SmallVec;

/// Sentinel marking a discarded complete index.
const DISCARDED: u32 = u32::MAX;

/// A [`Grid`] with a set of excluded cells and a dense re-indexing of the
/// cells that remain.
///
/// *Complete* indices address the full raster; *partial* indices address
/// `0..cell_count()` over the non-discarded cells only. The two mappings
/// form a bijection: `complete_index(partial_index(c)) == c` for every
/// non-discarded `c`, and symmetrically for partial indices.
#[derive(Clone, Debug)]
pub struct PartialGrid {
    grid: Grid,
    partial_of: Vec<u32>,
    complete_of: Vec<u32>,
}

impl PartialGrid {
    /// Create a partial grid excluding `discard`.
    ///
    /// Duplicate discard indices are harmless (the discard set is a set
    /// union); out-of-range indices are rejected.
    pub fn new(rows: u32, cols: u32, discard: &[u32]) -> Result<Self, BuildError> {
        let grid = Grid::new(rows, cols)?;
        let n = grid.cell_count();
        let mut partial_of = vec![0u32; n];
        for &cell in discard {
            if cell as usize >= n {
                return Err(BuildError::IndexOutOfRange {
                    name: "discard cell",
                    index: cell as usize,
                    count: n,
                });
            }
            partial_of[cell as usize] = DISCARDED;
        }
        let mut complete_of = Vec::with_capacity(n - discard.len().min(n));
        for complete in 0..n as u32 {
            if partial_of[complete as usize] == DISCARDED {
                continue;
            }
            partial_of[complete as usize] = complete_of.len() as u32;
            complete_of.push(complete);
        }
        Ok(Self {
            grid,
            partial_of,
            complete_of,
        })
    }

    /// The underlying complete grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Number of non-discarded cells.
    pub fn cell_count(&self) -> usize {
        self.complete_of.len()
    }

    /// `true` if the complete index is excluded.
    pub fn is_discarded(&self, complete: u32) -> bool {
        self.partial_of
            .get(complete as usize)
            .is_some_and(|&p| p == DISCARDED)
    }

    /// Partial index of a complete index; `None` when discarded or out of
    /// range.
    pub fn partial_index(&self, complete: u32) -> Option<u32> {
        match self.partial_of.get(complete as usize) {
            Some(&DISCARDED) | None => None,
            Some(&p) => Some(p),
        }
    }

    /// Complete index of a partial index; `None` when out of range.
    pub fn complete_index(&self, partial: u32) -> Option<u32> {
        self.complete_of.get(partial as usize).copied()
    }

    /// Cartesian center of a partial cell.
    pub fn cartesian(&self, partial: u32) -> Option<(f64, f64)> {
        self.grid.cartesian(self.complete_index(partial)?)
    }

    /// Adjacent partial cells of a partial cell, under `nbh`.
    ///
    /// Discarded neighbors are dropped; the result is expressed in partial
    /// indices. Out-of-range input yields an empty list.
    pub fn neighbors(&self, nbh: &dyn Neighborhood, partial: u32) -> SmallVec<[u32; 8]> {
        let Some(complete) = self.complete_index(partial) else {
            return SmallVec::new();
        };
        nbh.neighbors(&self.grid, complete)
            .into_iter()
            .filter_map(|c| self.partial_index(c))
            .collect()
    }
}
