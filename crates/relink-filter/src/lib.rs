//! Filter trait and propagation context for relink.
//!
//! A filter is a stateless narrowing operator: given the current bounded
//! graph domain and bound variables, it either tightens them or raises a
//! contradiction. The host solver owns the domains, registers filters
//! against domain-change events, and re-invokes them to a fixpoint.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod context;
pub mod filter;

pub use context::PropagationContext;
pub use filter::{Entailment, Filter, FilterError};
