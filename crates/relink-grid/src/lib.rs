//! Raster index spaces and pluggable neighborhoods.
//!
//! This crate maps a rectangular raster onto dense node index spaces and
//! defines adjacency over them:
//!
//! - [`Grid`]: the complete `rows x cols` raster.
//! - [`PartialGrid`]: a grid minus a discard set, with a bijection between
//!   complete and partial indices.
//! - [`GroupedGrid`]: a partial grid whose pre-labeled cells are merged
//!   into super-nodes carrying a cell-count size.
//! - [`Neighborhood`] / [`GroupedNeighborhood`]: adjacency functions
//!   ([`FourConnected`], [`EightConnected`], [`KWide`], [`Grouped`]).
//!
//! All types are immutable after construction and safe to share by
//! reference across filters and search branches.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod grid;
pub mod grouped;
pub mod neighborhood;
pub mod partial;

#[cfg(test)]
pub(crate) mod compliance;

pub use grid::Grid;
pub use grouped::GroupedGrid;
pub use neighborhood::{
    EightConnected, FourConnected, Grouped, GroupedNeighborhood, KWide, Neighborhood,
};
pub use partial::PartialGrid;
