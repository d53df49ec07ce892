//! Small graph and grid builders reused across crate tests.

use relink_graph::{BoundedGraph, GraphDomain, SpatialGraph};
use relink_grid::{GroupedGrid, PartialGrid};
use std::sync::Arc;

/// A path graph `0 - 1 - ... - n-1`.
pub fn path_graph(n: usize) -> Arc<SpatialGraph> {
    let edges: Vec<(u32, u32)> = (0..n.saturating_sub(1) as u32).map(|i| (i, i + 1)).collect();
    Arc::new(SpatialGraph::from_edges(n, &edges).expect("path edges in range"))
}

/// A full-envelope domain over a path graph with the given kernel nodes.
pub fn path_domain(n: usize, kernel: &[u32]) -> BoundedGraph {
    let mut d = BoundedGraph::full(path_graph(n));
    for &node in kernel {
        d.enforce_node(node).expect("kernel node in envelope");
    }
    d.take_changed();
    d
}

/// A grouped grid with no groups: every cell is its own node.
pub fn ungrouped_grid(rows: u32, cols: u32) -> GroupedGrid {
    let partial = PartialGrid::new(rows, cols, &[]).expect("non-empty grid");
    let labels = vec![None; (rows * cols) as usize];
    GroupedGrid::new(partial, &labels, 0).expect("labels match cell count")
}

/// The reference 3x3 habitat raster: class-1 cells at complete indices
/// `{0, 1, 3, 4}`, everything else class 0.
pub fn block_raster_3x3() -> (PartialGrid, [i32; 9]) {
    let grid = PartialGrid::new(3, 3, &[]).expect("non-empty grid");
    (grid, [1, 1, 0, 1, 1, 0, 0, 0, 0])
}
