//! Relink: connectivity-aware restoration planning building blocks.
//!
//! Given a raster landscape classified into habitat, non-habitat, and
//! restorable cells, relink provides the pieces a constraint-based host
//! solver needs to search for restoration plans: grid index spaces,
//! pluggable neighborhoods, connectivity labeling, a bounded graph
//! domain, and filters that tighten landscape-connectivity indices
//! (effective mesh size, integral index of connectivity), preserve
//! topology, and bound spatial compactness.
//!
//! This facade crate re-exports the public API of the relink sub-crates
//! and adds problem assembly from raw raster arrays.
//!
//! # Quick start
//!
//! ```rust
//! use relink::prelude::*;
//! use std::sync::Arc;
//!
//! // A 3x3 landscape with a 2x2 habitat block in one corner.
//! let data = LandscapeData::new(3, 3, vec![1, 1, 0, 1, 1, 0, 0, 0, 0], -1).unwrap();
//! let grid = data.grouped_grid(1, &FourConnected).unwrap();
//! assert_eq!(grid.group_count(), 1);
//!
//! // Initial effective mesh size of the untouched landscape.
//! let nbh = Grouped::new(FourConnected);
//! let mesh = relink::landscape::initial_mesh(&grid, &nbh, 9.0).unwrap();
//! assert!((mesh - 16.0 / 9.0).abs() < 1e-12);
//!
//! // A bounded domain over the spatial graph, ready for filters.
//! let graph = Arc::new(SpatialGraph::from_grouped(&grid, &nbh));
//! let mut domain = BoundedGraph::full(graph);
//! domain.enforce_node(0).unwrap();
//! let mut vars = VarStore::new();
//! let mesh_var = vars.new_int(0, i64::MAX).unwrap();
//! let filter = MeshFilter::builder()
//!     .var(mesh_var)
//!     .weights((0..grid.node_count() as u32)
//!         .map(|v| grid.node_size(v).unwrap_or(0) as f64)
//!         .collect())
//!     .landscape_area(9.0)
//!     .build()
//!     .unwrap();
//! let mut ctx = PropagationContext::new(&mut domain, &mut vars);
//! filter.propagate(&mut ctx).unwrap();
//! assert!(ctx.vars().int(mesh_var).unwrap().lo() >= 17778);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod landscape;

/// Core types: interval variables, contradictions, fixed-point scaling
/// (`relink-core`).
pub use relink_core as types;

/// Raster index spaces and neighborhoods (`relink-grid`).
pub use relink_grid as grid;

/// Spatial graphs, connectivity labeling, and the bounded graph domain
/// (`relink-graph`).
pub use relink_graph as graph;

/// The filter capability interface (`relink-filter`).
pub use relink_filter as filter;

/// Concrete filters: mesh, IIC, topology, compactness
/// (`relink-filters`).
pub use relink_filters as filters;

/// The most commonly used items across the workspace.
pub mod prelude {
    pub use crate::landscape::LandscapeData;
    pub use relink_core::{
        BuildError, Contradiction, IntVar, IntVarId, RealVar, RealVarId, VarStore,
    };
    pub use relink_filter::{Entailment, Filter, FilterError, PropagationContext};
    pub use relink_filters::{
        CompactnessFilter, IicFilter, MeshFilter, Point, TopologyFilter,
    };
    pub use relink_graph::{BoundedGraph, Components, GraphDomain, SpatialGraph};
    pub use relink_grid::{
        EightConnected, FourConnected, Grid, Grouped, GroupedGrid, GroupedNeighborhood, KWide,
        Neighborhood, PartialGrid,
    };
}
