//! Pluggable adjacency functions over grids.
//!
//! A [`Neighborhood`] maps a complete-grid cell to its distinct adjacent
//! cells; every variant is symmetric (`j` in `neighbors(i)` iff `i` in
//! `neighbors(j)`). [`GroupedNeighborhood`] lifts a raw neighborhood to
//! the node space of a [`GroupedGrid`].

use crate::grid::Grid;
use crate::grouped::GroupedGrid;
use relink_core::BuildError;
use smallvec::SmallVec;

/// Adjacency over the complete grid.
///
/// Implementations return distinct cells, never including the queried cell
/// itself, and are symmetric.
pub trait Neighborhood: Send + Sync + 'static {
    /// Adjacent cells of `cell`, as complete flat indices.
    ///
    /// Out-of-range input yields an empty list.
    fn neighbors(&self, grid: &Grid, cell: u32) -> SmallVec<[u32; 8]>;
}

/// Shared offset expansion for the two square-lattice variants.
fn offset_neighbors(grid: &Grid, cell: u32, offsets: &[(i64, i64)]) -> SmallVec<[u32; 8]> {
    let Some((row, col)) = grid.coordinates(cell) else {
        return SmallVec::new();
    };
    let mut out = SmallVec::new();
    for &(dr, dc) in offsets {
        let nr = row as i64 + dr;
        let nc = col as i64 + dc;
        if nr < 0 || nc < 0 {
            continue;
        }
        if let Some(n) = grid.cell_index(nr as u32, nc as u32) {
            out.push(n);
        }
    }
    out
}

/// Four-connected (von Neumann) neighborhood: N/S/E/W.
#[derive(Clone, Copy, Debug, Default)]
pub struct FourConnected;

impl Neighborhood for FourConnected {
    fn neighbors(&self, grid: &Grid, cell: u32) -> SmallVec<[u32; 8]> {
        offset_neighbors(grid, cell, &[(-1, 0), (1, 0), (0, -1), (0, 1)])
    }
}

/// Eight-connected (Moore) neighborhood: the four cardinals plus diagonals.
#[derive(Clone, Copy, Debug, Default)]
pub struct EightConnected;

impl Neighborhood for EightConnected {
    fn neighbors(&self, grid: &Grid, cell: u32) -> SmallVec<[u32; 8]> {
        offset_neighbors(
            grid,
            cell,
            &[
                (-1, -1),
                (-1, 0),
                (-1, 1),
                (0, -1),
                (0, 1),
                (1, -1),
                (1, 0),
                (1, 1),
            ],
        )
    }
}

/// `k` iterations of one-step expansion over a base neighborhood.
///
/// The result is de-duplicated and excludes the queried cell. `KWide<N>`
/// with `k == 1` behaves exactly like `N`.
#[derive(Clone, Copy, Debug)]
pub struct KWide<N> {
    base: N,
    k: u32,
}

impl<N: Neighborhood> KWide<N> {
    /// Create a `k`-wide neighborhood; `k` must be at least 1.
    pub fn new(base: N, k: u32) -> Result<Self, BuildError> {
        if k == 0 {
            return Err(BuildError::NonPositive {
                name: "k",
                value: 0.0,
            });
        }
        Ok(Self { base, k })
    }

    /// The expansion depth.
    pub fn k(&self) -> u32 {
        self.k
    }
}

impl<N: Neighborhood> Neighborhood for KWide<N> {
    fn neighbors(&self, grid: &Grid, cell: u32) -> SmallVec<[u32; 8]> {
        if grid.coordinates(cell).is_none() {
            return SmallVec::new();
        }
        let mut reached: Vec<u32> = vec![cell];
        let mut frontier: Vec<u32> = vec![cell];
        for _ in 0..self.k {
            let mut next = Vec::new();
            for &f in &frontier {
                for n in self.base.neighbors(grid, f) {
                    if !reached.contains(&n) {
                        reached.push(n);
                        next.push(n);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }
        reached.retain(|&n| n != cell);
        reached.sort_unstable();
        reached.into_iter().collect()
    }
}

/// Adjacency over the node space of a [`GroupedGrid`].
pub trait GroupedNeighborhood: Send + Sync + 'static {
    /// Adjacent grouped nodes of `node`, distinct and excluding `node`.
    fn neighbors(&self, grid: &GroupedGrid, node: u32) -> Vec<u32>;
}

/// Lifts a raw neighborhood to grouped nodes.
///
/// For a group node, the raw-cell neighbor sets of every member cell are
/// unioned, mapped to grouped ids, and the node's own group is excluded;
/// an ungrouped node does the same over its single cell. Symmetry of the
/// base neighborhood carries over.
#[derive(Clone, Copy, Debug)]
pub struct Grouped<N> {
    base: N,
}

impl<N: Neighborhood> Grouped<N> {
    /// Lift `base` to grouped indices.
    pub fn new(base: N) -> Self {
        Self { base }
    }
}

impl<N: Neighborhood> GroupedNeighborhood for Grouped<N> {
    fn neighbors(&self, grid: &GroupedGrid, node: u32) -> Vec<u32> {
        let partial = grid.partial();
        let mut out = Vec::new();
        for &cell in grid.cells_of(node) {
            for p in partial.neighbors(&self.base, cell) {
                let Some(n) = grid.node_of(p) else { continue };
                if n != node && !out.contains(&n) {
                    out.push(n);
                }
            }
        }
        out.sort_unstable();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;

    #[test]
    fn four_connected_interior_edge_corner() {
        let g = Grid::new(5, 5).unwrap();
        let center = g.cell_index(2, 2).unwrap();
        assert_eq!(FourConnected.neighbors(&g, center).len(), 4);
        let corner = g.cell_index(0, 0).unwrap();
        let mut n: Vec<u32> = FourConnected.neighbors(&g, corner).into_vec();
        n.sort_unstable();
        assert_eq!(n, vec![1, 5]);
        let edge = g.cell_index(0, 2).unwrap();
        assert_eq!(FourConnected.neighbors(&g, edge).len(), 3);
    }

    #[test]
    fn eight_connected_counts() {
        let g = Grid::new(5, 5).unwrap();
        assert_eq!(
            EightConnected
                .neighbors(&g, g.cell_index(2, 2).unwrap())
                .len(),
            8
        );
        assert_eq!(
            EightConnected
                .neighbors(&g, g.cell_index(0, 0).unwrap())
                .len(),
            3
        );
        assert_eq!(
            EightConnected
                .neighbors(&g, g.cell_index(0, 2).unwrap())
                .len(),
            5
        );
    }

    #[test]
    fn out_of_range_cell_has_no_neighbors() {
        let g = Grid::new(2, 2).unwrap();
        assert!(FourConnected.neighbors(&g, 4).is_empty());
        assert!(EightConnected.neighbors(&g, 99).is_empty());
    }

    #[test]
    fn k_wide_one_matches_base() {
        let g = Grid::new(4, 4).unwrap();
        let k1 = KWide::new(FourConnected, 1).unwrap();
        for cell in 0..16 {
            let mut a: Vec<u32> = FourConnected.neighbors(&g, cell).into_vec();
            a.sort_unstable();
            let b: Vec<u32> = k1.neighbors(&g, cell).into_vec();
            assert_eq!(a, b, "cell {cell}");
        }
    }

    #[test]
    fn k_wide_two_is_the_manhattan_disk() {
        let g = Grid::new(5, 5).unwrap();
        let k2 = KWide::new(FourConnected, 2).unwrap();
        let n = k2.neighbors(&g, g.cell_index(2, 2).unwrap());
        // Diamond of radius 2 minus the center: 13 - 1 cells.
        assert_eq!(n.len(), 12);
    }

    #[test]
    fn k_wide_rejects_zero() {
        assert!(KWide::new(FourConnected, 0).is_err());
    }

    #[test]
    fn single_cell_grid_has_no_neighbors() {
        let g = Grid::new(1, 1).unwrap();
        assert!(FourConnected.neighbors(&g, 0).is_empty());
        let k3 = KWide::new(EightConnected, 3).unwrap();
        assert!(k3.neighbors(&g, 0).is_empty());
    }

    #[test]
    fn compliance_four_connected() {
        let g = Grid::new(6, 4).unwrap();
        compliance::run_neighborhood_compliance(&g, &FourConnected);
    }

    #[test]
    fn compliance_eight_connected() {
        let g = Grid::new(6, 4).unwrap();
        compliance::run_neighborhood_compliance(&g, &EightConnected);
    }

    #[test]
    fn compliance_k_wide() {
        let g = Grid::new(6, 4).unwrap();
        let k2 = KWide::new(FourConnected, 2).unwrap();
        compliance::run_neighborhood_compliance(&g, &k2);
    }
}
