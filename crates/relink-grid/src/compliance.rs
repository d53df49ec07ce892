//! Neighborhood compliance test helpers.
//!
//! Shared assertions for the invariants every adjacency variant must
//! satisfy, reused across the neighborhood and grouped-grid test modules.

use crate::grid::Grid;
use crate::grouped::GroupedGrid;
use crate::neighborhood::{GroupedNeighborhood, Neighborhood};

/// Assert that neighbor lists contain no duplicates and never the cell
/// itself.
pub fn assert_neighbors_distinct(grid: &Grid, nbh: &dyn Neighborhood) {
    for cell in 0..grid.cell_count() as u32 {
        let n = nbh.neighbors(grid, cell);
        for (i, a) in n.iter().enumerate() {
            assert_ne!(*a, cell, "cell {cell} lists itself");
            assert!(
                !n[i + 1..].contains(a),
                "cell {cell} lists neighbor {a} twice"
            );
        }
    }
}

/// Assert `b in neighbors(a)` implies `a in neighbors(b)`.
pub fn assert_neighbors_symmetric(grid: &Grid, nbh: &dyn Neighborhood) {
    for cell in 0..grid.cell_count() as u32 {
        for n in nbh.neighbors(grid, cell) {
            assert!(
                nbh.neighbors(grid, n).contains(&cell),
                "symmetry violated: {n} in N({cell}) but {cell} not in N({n})"
            );
        }
    }
}

/// Run every complete-grid neighborhood check.
pub fn run_neighborhood_compliance(grid: &Grid, nbh: &dyn Neighborhood) {
    assert_neighbors_distinct(grid, nbh);
    assert_neighbors_symmetric(grid, nbh);
}

/// Grouped-space mirror of the distinctness and symmetry checks.
pub fn run_grouped_compliance(grid: &GroupedGrid, nbh: &dyn GroupedNeighborhood) {
    for node in 0..grid.node_count() as u32 {
        let n = nbh.neighbors(grid, node);
        for (i, a) in n.iter().enumerate() {
            assert_ne!(*a, node, "node {node} lists itself");
            assert!(
                !n[i + 1..].contains(a),
                "node {node} lists neighbor {a} twice"
            );
            assert!(
                nbh.neighbors(grid, *a).contains(&node),
                "symmetry violated: {a} in N({node}) but {node} not in N({a})"
            );
        }
    }
}
