//! Core types for the relink restoration-planning toolkit.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! vocabulary shared by every other relink crate: narrowing interval
//! variables and their store, the contradiction and construction error
//! types, and the fixed-point scaling used to compare landscape indices
//! as integers.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod fixed;
pub mod var;

pub use error::{BuildError, Contradiction};
pub use var::{IntVar, IntVarId, RealVar, RealVarId, VarStore};
