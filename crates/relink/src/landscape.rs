//! Problem assembly from raw raster arrays.
//!
//! [`LandscapeData`] carries the per-cell arrays a data-loading
//! collaborator produces (habitat class, accessibility, restorable
//! amount, optional cell area, and a no-data sentinel) and turns them
//! into the immutable structures the filters consume: a [`GroupedGrid`]
//! whose groups are the pre-existing habitat patches, and initial index
//! values for reporting.

use relink_core::BuildError;
use relink_filters::circle::Point;
use relink_filters::{effective_mesh_size, integral_index_of_connectivity};
use relink_graph::{Components, SpatialGraph};
use relink_grid::{GroupedGrid, GroupedNeighborhood, Neighborhood, PartialGrid};

/// Raw per-cell raster arrays plus the no-data sentinel.
///
/// All arrays are indexed by complete cell in row-major order. Cells
/// whose habitat class equals the sentinel are outside the landscape and
/// are discarded from every derived index space.
#[derive(Clone, Debug)]
pub struct LandscapeData {
    rows: u32,
    cols: u32,
    habitat: Vec<i32>,
    accessible: Option<Vec<bool>>,
    restorable: Option<Vec<f64>>,
    cell_area: Option<Vec<f64>>,
    no_data: i32,
}

impl LandscapeData {
    /// Wrap a habitat class raster.
    pub fn new(rows: u32, cols: u32, habitat: Vec<i32>, no_data: i32) -> Result<Self, BuildError> {
        let expected = rows as usize * cols as usize;
        if rows == 0 || cols == 0 {
            return Err(BuildError::EmptyGrid);
        }
        if habitat.len() != expected {
            return Err(BuildError::LengthMismatch {
                name: "habitat",
                expected,
                actual: habitat.len(),
            });
        }
        Ok(Self {
            rows,
            cols,
            habitat,
            accessible: None,
            restorable: None,
            cell_area: None,
            no_data,
        })
    }

    /// Attach a per-cell accessibility mask.
    pub fn with_accessible(mut self, accessible: Vec<bool>) -> Result<Self, BuildError> {
        if accessible.len() != self.habitat.len() {
            return Err(BuildError::LengthMismatch {
                name: "accessible",
                expected: self.habitat.len(),
                actual: accessible.len(),
            });
        }
        self.accessible = Some(accessible);
        Ok(self)
    }

    /// Attach per-cell restorable amounts.
    pub fn with_restorable(mut self, restorable: Vec<f64>) -> Result<Self, BuildError> {
        if restorable.len() != self.habitat.len() {
            return Err(BuildError::LengthMismatch {
                name: "restorable",
                expected: self.habitat.len(),
                actual: restorable.len(),
            });
        }
        self.restorable = Some(restorable);
        Ok(self)
    }

    /// Attach per-cell areas; without them every cell counts as 1.
    pub fn with_cell_area(mut self, cell_area: Vec<f64>) -> Result<Self, BuildError> {
        if cell_area.len() != self.habitat.len() {
            return Err(BuildError::LengthMismatch {
                name: "cell_area",
                expected: self.habitat.len(),
                actual: cell_area.len(),
            });
        }
        if let Some(&bad) = cell_area.iter().find(|&&a| !(a > 0.0)) {
            return Err(BuildError::NonPositive {
                name: "cell_area",
                value: bad,
            });
        }
        self.cell_area = Some(cell_area);
        Ok(self)
    }

    /// Raster height.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Raster width.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Habitat class of a complete cell.
    pub fn habitat(&self, cell: u32) -> Option<i32> {
        self.habitat.get(cell as usize).copied()
    }

    /// `true` if the cell may be restored (accessible, in-landscape,
    /// and not already of the given habitat class).
    pub fn is_restorable(&self, cell: u32, target_class: i32) -> bool {
        let Some(class) = self.habitat(cell) else {
            return false;
        };
        if class == self.no_data || class == target_class {
            return false;
        }
        self.accessible
            .as_ref()
            .map_or(true, |mask| mask[cell as usize])
    }

    /// Restorable amount of a complete cell (0 when none attached).
    pub fn restorable(&self, cell: u32) -> f64 {
        self.restorable
            .as_ref()
            .and_then(|r| r.get(cell as usize).copied())
            .unwrap_or(0.0)
    }

    /// Complete indices of the no-data cells.
    pub fn discarded_cells(&self) -> Vec<u32> {
        self.habitat
            .iter()
            .enumerate()
            .filter(|(_, &class)| class == self.no_data)
            .map(|(cell, _)| cell as u32)
            .collect()
    }

    /// Total landscape area: summed cell areas of in-landscape cells, or
    /// their count when no areas are attached.
    pub fn landscape_area(&self) -> f64 {
        match &self.cell_area {
            Some(areas) => self
                .habitat
                .iter()
                .zip(areas)
                .filter(|(&class, _)| class != self.no_data)
                .map(|(_, &a)| a)
                .sum(),
            None => self
                .habitat
                .iter()
                .filter(|&&class| class != self.no_data)
                .count() as f64,
        }
    }

    /// Build the grouped grid: no-data cells discarded, habitat patches
    /// of `target_class` (under `nbh`) merged into groups.
    pub fn grouped_grid(
        &self,
        target_class: i32,
        nbh: &dyn Neighborhood,
    ) -> Result<GroupedGrid, BuildError> {
        let partial = PartialGrid::new(self.rows, self.cols, &self.discarded_cells())?;
        let habitat = Components::of_raster(&partial, nbh, &self.habitat, target_class)?;
        let (labels, group_count) = habitat.grouping_labels();
        GroupedGrid::new(partial, &labels, group_count)
    }
}

/// Components of the pre-existing habitat: the group nodes of `grid`
/// under the grouped adjacency `nbh`.
fn habitat_components(
    grid: &GroupedGrid,
    nbh: &dyn GroupedNeighborhood,
) -> Result<Components, BuildError> {
    let graph = SpatialGraph::from_grouped(grid, nbh);
    let groups: Vec<u32> = (0..grid.group_count()).collect();
    Components::of_subgraph(&graph, &groups, |v| {
        grid.node_size(v).unwrap_or(0) as f64
    })
}

/// Initial effective mesh size of the untouched landscape.
///
/// Computed from the static graph of habitat groups, before any
/// restoration decision; used to report the pre-optimization index.
pub fn initial_mesh(
    grid: &GroupedGrid,
    nbh: &dyn GroupedNeighborhood,
    landscape_area: f64,
) -> Result<f64, BuildError> {
    let components = habitat_components(grid, nbh)?;
    effective_mesh_size(&components, landscape_area)
}

/// Initial integral index of connectivity of the untouched landscape.
pub fn initial_iic(
    grid: &GroupedGrid,
    nbh: &dyn GroupedNeighborhood,
    distance_threshold: f64,
    landscape_area: f64,
) -> Result<f64, BuildError> {
    let components = habitat_components(grid, nbh)?;
    let node_cells: Vec<Vec<Point>> = (0..grid.node_count() as u32)
        .map(|v| {
            grid.cells_of(v)
                .iter()
                .filter_map(|&cell| grid.partial().cartesian(cell))
                .map(|(x, y)| Point::new(x, y))
                .collect()
        })
        .collect();
    integral_index_of_connectivity(&components, &node_cells, distance_threshold, landscape_area)
}

#[cfg(test)]
mod tests {
    use super::*;
    use relink_grid::{FourConnected, Grouped};

    fn two_patch_data() -> LandscapeData {
        // 3x3: habitat block {0, 1}, habitat cell {8}, no-data cell {6}.
        LandscapeData::new(3, 3, vec![1, 1, 0, 0, 0, 0, -1, 0, 1], -1).unwrap()
    }

    #[test]
    fn construction_validates_lengths() {
        assert!(matches!(
            LandscapeData::new(3, 3, vec![0; 8], -1),
            Err(BuildError::LengthMismatch { .. })
        ));
        assert!(matches!(
            LandscapeData::new(0, 3, vec![], -1),
            Err(BuildError::EmptyGrid)
        ));
        let d = two_patch_data();
        assert!(d.with_accessible(vec![true; 4]).is_err());
        assert!(matches!(
            two_patch_data().with_cell_area(vec![0.0; 9]),
            Err(BuildError::NonPositive { .. })
        ));
    }

    #[test]
    fn no_data_cells_are_discarded() {
        let d = two_patch_data();
        assert_eq!(d.discarded_cells(), vec![6]);
        assert_eq!(d.landscape_area(), 8.0);
        let grid = d.grouped_grid(1, &FourConnected).unwrap();
        assert_eq!(grid.partial().cell_count(), 8);
        assert!(grid.partial().is_discarded(6));
    }

    #[test]
    fn habitat_patches_become_groups() {
        let d = two_patch_data();
        let grid = d.grouped_grid(1, &FourConnected).unwrap();
        assert_eq!(grid.group_count(), 2);
        assert_eq!(grid.node_size(0), Some(2));
        assert_eq!(grid.node_size(1), Some(1));
        // 8 partial cells, 3 in groups, 5 ungrouped.
        assert_eq!(grid.node_count(), 7);
    }

    #[test]
    fn restorable_respects_class_and_accessibility() {
        let d = two_patch_data()
            .with_accessible(vec![
                true, true, true, false, true, true, true, true, true,
            ])
            .unwrap();
        assert!(!d.is_restorable(0, 1), "already habitat");
        assert!(!d.is_restorable(6, 1), "no data");
        assert!(!d.is_restorable(3, 1), "inaccessible");
        assert!(d.is_restorable(2, 1));
    }

    #[test]
    fn cell_area_weights_the_landscape() {
        let d = two_patch_data().with_cell_area(vec![2.0; 9]).unwrap();
        assert_eq!(d.landscape_area(), 16.0);
    }

    #[test]
    fn initial_indices_of_the_reference_block() {
        // 3x3, habitat block {0, 1, 3, 4}: MESH = 16/9.
        let d = LandscapeData::new(3, 3, vec![1, 1, 0, 1, 1, 0, 0, 0, 0], -1).unwrap();
        let grid = d.grouped_grid(1, &FourConnected).unwrap();
        let nbh = Grouped::new(FourConnected);
        let mesh = initial_mesh(&grid, &nbh, d.landscape_area()).unwrap();
        assert!((mesh - 16.0 / 9.0).abs() < 1e-12);
        let iic = initial_iic(&grid, &nbh, 1.0, d.landscape_area()).unwrap();
        assert!((iic - 16.0 / 81.0).abs() < 1e-12);
    }
}
