//! A partial grid with pre-labeled cells merged into groups.

use crate::partial::PartialGrid;
use relink_core::BuildError;

/// A [`PartialGrid`] whose labeled cells are merged into immutable groups.
///
/// The node space is `[0, group_count())` for groups followed by
/// `[group_count(), node_count())` for the remaining ungrouped cells, the
/// latter in partial-index scan order. Each group carries a `size` equal
/// to its member cell count; ungrouped nodes have size 1.
///
/// The labeling is produced offline (typically by the connectivity finder
/// over pre-existing habitat) and fixed at problem-build time; a grouped
/// grid is never mutated during search.
#[derive(Clone, Debug)]
pub struct GroupedGrid {
    partial: PartialGrid,
    node_of_partial: Vec<u32>,
    group_cells: Vec<Vec<u32>>,
    ungrouped_cell: Vec<u32>,
}

impl GroupedGrid {
    /// Merge cells of `partial` according to `labels`.
    ///
    /// `labels[p]` is `Some(g)` when partial cell `p` belongs to group
    /// `g < group_count`, `None` when the cell stays ungrouped. Group ids
    /// follow the labeling's component discovery order; every id below
    /// `group_count` must be used by at least one cell.
    pub fn new(
        partial: PartialGrid,
        labels: &[Option<u32>],
        group_count: u32,
    ) -> Result<Self, BuildError> {
        if labels.len() != partial.cell_count() {
            return Err(BuildError::LengthMismatch {
                name: "labels",
                expected: partial.cell_count(),
                actual: labels.len(),
            });
        }
        let mut group_cells: Vec<Vec<u32>> = vec![Vec::new(); group_count as usize];
        let mut ungrouped_cell = Vec::new();
        let mut node_of_partial = vec![0u32; labels.len()];
        for (p, label) in labels.iter().enumerate() {
            match *label {
                Some(g) => {
                    if g >= group_count {
                        return Err(BuildError::IndexOutOfRange {
                            name: "group",
                            index: g as usize,
                            count: group_count as usize,
                        });
                    }
                    node_of_partial[p] = g;
                    group_cells[g as usize].push(p as u32);
                }
                None => {
                    node_of_partial[p] = group_count + ungrouped_cell.len() as u32;
                    ungrouped_cell.push(p as u32);
                }
            }
        }
        if let Some(empty) = group_cells.iter().position(Vec::is_empty) {
            return Err(BuildError::IndexOutOfRange {
                name: "empty group",
                index: empty,
                count: group_count as usize,
            });
        }
        Ok(Self {
            partial,
            node_of_partial,
            group_cells,
            ungrouped_cell,
        })
    }

    /// The underlying partial grid.
    pub fn partial(&self) -> &PartialGrid {
        &self.partial
    }

    /// Number of group nodes.
    pub fn group_count(&self) -> u32 {
        self.group_cells.len() as u32
    }

    /// Number of ungrouped nodes.
    pub fn ungrouped_count(&self) -> u32 {
        self.ungrouped_cell.len() as u32
    }

    /// Total number of nodes (groups plus ungrouped cells).
    pub fn node_count(&self) -> usize {
        self.group_cells.len() + self.ungrouped_cell.len()
    }

    /// `true` if `node` is a group node.
    pub fn is_group(&self, node: u32) -> bool {
        node < self.group_count()
    }

    /// Node of a partial cell.
    pub fn node_of(&self, partial: u32) -> Option<u32> {
        self.node_of_partial.get(partial as usize).copied()
    }

    /// Member partial cells of a node; a single cell for ungrouped nodes.
    ///
    /// Out-of-range nodes yield an empty slice.
    pub fn cells_of(&self, node: u32) -> &[u32] {
        if let Some(group) = self.group_cells.get(node as usize) {
            return group;
        }
        match self
            .ungrouped_cell
            .get(node as usize - self.group_cells.len())
        {
            Some(cell) => std::slice::from_ref(cell),
            None => &[],
        }
    }

    /// Cell-count size of a node (aggregation weight).
    pub fn node_size(&self, node: u32) -> Option<u32> {
        if (node as usize) < self.node_count() {
            Some(self.cells_of(node).len() as u32)
        } else {
            None
        }
    }

    /// Cartesian centroid of a node's member cell centers.
    pub fn cartesian(&self, node: u32) -> Option<(f64, f64)> {
        let cells = self.cells_of(node);
        if cells.is_empty() {
            return None;
        }
        let mut x = 0.0;
        let mut y = 0.0;
        for &cell in cells {
            let (cx, cy) = self.partial.cartesian(cell)?;
            x += cx;
            y += cy;
        }
        let n = cells.len() as f64;
        Some((x / n, y / n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;
    use crate::neighborhood::{FourConnected, Grouped, GroupedNeighborhood};

    /// 3x3 grid, habitat block {0, 1, 3, 4} labeled as one group.
    fn block_grid() -> GroupedGrid {
        let partial = PartialGrid::new(3, 3, &[]).unwrap();
        let labels = [
            Some(0),
            Some(0),
            None,
            Some(0),
            Some(0),
            None,
            None,
            None,
            None,
        ];
        GroupedGrid::new(partial, &labels, 1).unwrap()
    }

    #[test]
    fn node_space_layout() {
        let g = block_grid();
        assert_eq!(g.group_count(), 1);
        assert_eq!(g.ungrouped_count(), 5);
        assert_eq!(g.node_count(), 6);
        assert!(g.is_group(0));
        assert!(!g.is_group(1));
        // Ungrouped cells 2, 5, 6, 7, 8 take nodes 1..6 in scan order.
        assert_eq!(g.node_of(2), Some(1));
        assert_eq!(g.node_of(8), Some(5));
        assert_eq!(g.node_of(0), Some(0));
    }

    #[test]
    fn sizes_and_members() {
        let g = block_grid();
        assert_eq!(g.node_size(0), Some(4));
        assert_eq!(g.node_size(1), Some(1));
        assert_eq!(g.node_size(6), None);
        assert_eq!(g.cells_of(0), &[0, 1, 3, 4]);
        assert_eq!(g.cells_of(2), &[5]);
        assert!(g.cells_of(99).is_empty());
    }

    #[test]
    fn grouping_consistent_with_labels() {
        let g = block_grid();
        for (a, b) in [(0u32, 1u32), (0, 3), (1, 4)] {
            assert_eq!(g.node_of(a), g.node_of(b));
        }
        assert_ne!(g.node_of(2), g.node_of(0));
    }

    #[test]
    fn centroid_of_group() {
        let g = block_grid();
        // Block {(0,0),(0,1),(1,0),(1,1)} centers average to (1.0, 1.0).
        assert_eq!(g.cartesian(0), Some((1.0, 1.0)));
        assert_eq!(g.cartesian(1), Some((2.5, 0.5)));
    }

    #[test]
    fn rejects_bad_labels() {
        let partial = PartialGrid::new(2, 2, &[]).unwrap();
        assert!(matches!(
            GroupedGrid::new(partial.clone(), &[None, None, None], 0),
            Err(BuildError::LengthMismatch { .. })
        ));
        assert!(matches!(
            GroupedGrid::new(partial.clone(), &[Some(1), None, None, None], 1),
            Err(BuildError::IndexOutOfRange { .. })
        ));
        // Declared group 1 never used.
        assert!(matches!(
            GroupedGrid::new(partial, &[Some(0), None, None, None], 2),
            Err(BuildError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn grouped_neighbors_union_and_exclude_self() {
        let g = block_grid();
        let nbh = Grouped::new(FourConnected);
        // The group touches cells 2, 5, 6, 7 -> nodes 1, 2, 3, 4.
        assert_eq!(nbh.neighbors(&g, 0), vec![1, 2, 3, 4]);
        // Cell 2 touches cell 1 (group) and cell 5 (node 2).
        assert_eq!(nbh.neighbors(&g, 1), vec![0, 2]);
    }

    #[test]
    fn grouped_neighbors_respect_discards() {
        // Same block, but cell 5 discarded: node ids shift and the group
        // loses one neighbor.
        let partial = PartialGrid::new(3, 3, &[5]).unwrap();
        let labels = [
            Some(0),
            Some(0),
            None,
            Some(0),
            Some(0),
            None,
            None,
            None,
        ];
        let g = GroupedGrid::new(partial, &labels, 1).unwrap();
        let nbh = Grouped::new(FourConnected);
        // Neighbors: cell 2 (node 1), cell 6 (node 2), cell 7 (node 3).
        assert_eq!(nbh.neighbors(&g, 0), vec![1, 2, 3]);
    }

    #[test]
    fn compliance_grouped_four_connected() {
        let g = block_grid();
        let nbh = Grouped::new(FourConnected);
        compliance::run_grouped_compliance(&g, &nbh);
    }
}
