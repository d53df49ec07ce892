//! Concrete relink filters.
//!
//! Four narrowing operators over a bounded graph domain, each behind the
//! [`relink_filter::Filter`] capability interface:
//!
//! - [`MeshFilter`]: effective mesh size bounds with a dominance cut.
//! - [`IicFilter`]: integral index of connectivity bounds via inter-patch
//!   shortest paths.
//! - [`TopologyFilter`]: forbids components disconnected from the
//!   committed selection.
//! - [`CompactnessFilter`]: smallest-enclosing-circle pruning of the
//!   selectable point set.
//!
//! Plus the supporting geometry in [`circle`] and static index
//! computation for pre-optimization reporting.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod circle;
pub mod compactness;
pub mod iic;
pub mod mesh;
pub mod topology;

pub use circle::{Circle, EnclosingCircle, Point};
pub use compactness::CompactnessFilter;
pub use iic::{integral_index_of_connectivity, IicFilter};
pub use mesh::{effective_mesh_size, MeshFilter};
pub use topology::TopologyFilter;
