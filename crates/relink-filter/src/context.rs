//! Mutable state handed to a filter for one propagation call.

use relink_core::VarStore;
use relink_graph::GraphDomain;

/// The per-call view of a search branch's mutable state.
///
/// Bundles the bounded graph domain and the bound-variable store behind
/// one split-borrow struct, so the [`Filter`](crate::Filter) trait stays
/// object-safe and hosts can substitute their own domain representation
/// through `dyn GraphDomain`.
pub struct PropagationContext<'a> {
    graph: &'a mut dyn GraphDomain,
    vars: &'a mut VarStore,
}

impl<'a> PropagationContext<'a> {
    /// Construct a context for one propagation call.
    ///
    /// Typically called by the host once per domain-change notification;
    /// tests construct it directly around a `BoundedGraph` and a store.
    pub fn new(graph: &'a mut dyn GraphDomain, vars: &'a mut VarStore) -> Self {
        Self { graph, vars }
    }

    /// Read access to the graph domain.
    pub fn graph(&self) -> &dyn GraphDomain {
        self.graph
    }

    /// Narrowing access to the graph domain.
    pub fn graph_mut(&mut self) -> &mut dyn GraphDomain {
        self.graph
    }

    /// Read access to the bound variables.
    pub fn vars(&self) -> &VarStore {
        self.vars
    }

    /// Narrowing access to the bound variables.
    pub fn vars_mut(&mut self) -> &mut VarStore {
        self.vars
    }
}
