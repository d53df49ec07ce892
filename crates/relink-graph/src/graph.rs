//! Immutable adjacency lists over a node space.

use relink_core::BuildError;
use relink_grid::{GroupedGrid, GroupedNeighborhood};

/// An undirected graph stored as per-node adjacency lists.
///
/// Built once at problem-assembly time, from a grouped grid and a
/// neighborhood or from an explicit edge list, then shared by reference
/// across every filter and search branch. Lists are sorted and
/// duplicate-free; self-loops are dropped.
#[derive(Clone, Debug)]
pub struct SpatialGraph {
    adj: Vec<Vec<u32>>,
}

impl SpatialGraph {
    /// Build the adjacency of every node of `grid` under `nbh`.
    pub fn from_grouped(grid: &GroupedGrid, nbh: &dyn GroupedNeighborhood) -> Self {
        let adj = (0..grid.node_count() as u32)
            .map(|node| nbh.neighbors(grid, node))
            .collect();
        Self { adj }
    }

    /// Build a graph on `node_count` nodes from an explicit edge list.
    ///
    /// Endpoints must be in range; duplicate edges and self-loops are
    /// dropped. Intended for hosts and tests that do not start from a
    /// raster.
    pub fn from_edges(node_count: usize, edges: &[(u32, u32)]) -> Result<Self, BuildError> {
        let mut adj: Vec<Vec<u32>> = vec![Vec::new(); node_count];
        for &(a, b) in edges {
            for endpoint in [a, b] {
                if endpoint as usize >= node_count {
                    return Err(BuildError::IndexOutOfRange {
                        name: "edge endpoint",
                        index: endpoint as usize,
                        count: node_count,
                    });
                }
            }
            if a == b {
                continue;
            }
            adj[a as usize].push(b);
            adj[b as usize].push(a);
        }
        for list in &mut adj {
            list.sort_unstable();
            list.dedup();
        }
        Ok(Self { adj })
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.adj.len()
    }

    /// Adjacent nodes of `node`; empty for out-of-range input.
    pub fn neighbors(&self, node: u32) -> &[u32] {
        self.adj.get(node as usize).map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relink_grid::{FourConnected, Grouped, PartialGrid};

    #[test]
    fn from_edges_sorts_and_dedups() {
        let g = SpatialGraph::from_edges(4, &[(1, 0), (0, 1), (2, 1), (3, 3)]).unwrap();
        assert_eq!(g.neighbors(0), &[1]);
        assert_eq!(g.neighbors(1), &[0, 2]);
        assert_eq!(g.neighbors(3), &[] as &[u32]);
        assert!(g.neighbors(9).is_empty());
    }

    #[test]
    fn from_edges_rejects_out_of_range() {
        assert!(matches!(
            SpatialGraph::from_edges(2, &[(0, 2)]),
            Err(BuildError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn from_grouped_matches_neighborhood() {
        let partial = PartialGrid::new(2, 2, &[]).unwrap();
        let grid = relink_grid::GroupedGrid::new(partial, &[None; 4], 0).unwrap();
        let g = SpatialGraph::from_grouped(&grid, &Grouped::new(FourConnected));
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.neighbors(0), &[1, 2]);
        assert_eq!(g.neighbors(3), &[1, 2]);
    }
}
