//! The concrete bounded graph domain.

use crate::domain::GraphDomain;
use crate::graph::SpatialGraph;
use indexmap::IndexSet;
use relink_core::{BuildError, Contradiction};
use std::sync::Arc;

/// [`GraphDomain`] implementation backed by an [`IndexSet`] per bound.
///
/// The spatial adjacency is shared (`Arc`) so that many search branches
/// can hold independent domains over one graph. Membership tests go
/// through dense bitmaps; iteration goes through the index sets, whose
/// order is a deterministic function of the operation sequence.
#[derive(Clone, Debug)]
pub struct BoundedGraph {
    graph: Arc<SpatialGraph>,
    kernel: IndexSet<u32>,
    envelope: IndexSet<u32>,
    kernel_mask: Vec<bool>,
    envelope_mask: Vec<bool>,
    changed: bool,
}

impl BoundedGraph {
    /// Create a domain with the given kernel and envelope node sets.
    ///
    /// `envelope` must list every possibly-present node, kernel nodes
    /// included. Rejects out-of-range nodes and kernel nodes missing from
    /// the envelope.
    pub fn new(
        graph: Arc<SpatialGraph>,
        kernel: &[u32],
        envelope: &[u32],
    ) -> Result<Self, BuildError> {
        let n = graph.node_count();
        let mut envelope_mask = vec![false; n];
        let mut envelope_set = IndexSet::with_capacity(envelope.len());
        for &node in envelope {
            if node as usize >= n {
                return Err(BuildError::IndexOutOfRange {
                    name: "envelope node",
                    index: node as usize,
                    count: n,
                });
            }
            if envelope_set.insert(node) {
                envelope_mask[node as usize] = true;
            }
        }
        let mut kernel_mask = vec![false; n];
        let mut kernel_set = IndexSet::with_capacity(kernel.len());
        for &node in kernel {
            if node as usize >= n || !envelope_mask[node as usize] {
                return Err(BuildError::IndexOutOfRange {
                    name: "kernel node",
                    index: node as usize,
                    count: n,
                });
            }
            if kernel_set.insert(node) {
                kernel_mask[node as usize] = true;
            }
        }
        Ok(Self {
            graph,
            kernel: kernel_set,
            envelope: envelope_set,
            kernel_mask,
            envelope_mask,
            changed: false,
        })
    }

    /// Domain with an empty kernel and every node in the envelope.
    pub fn full(graph: Arc<SpatialGraph>) -> Self {
        let n = graph.node_count();
        let envelope: IndexSet<u32> = (0..n as u32).collect();
        Self {
            graph,
            kernel: IndexSet::new(),
            envelope,
            kernel_mask: vec![false; n],
            envelope_mask: vec![true; n],
            changed: false,
        }
    }

    /// The shared spatial adjacency.
    pub fn graph(&self) -> &SpatialGraph {
        &self.graph
    }

    /// Report and clear the change flag.
    ///
    /// Hosts use this to detect a fixpoint: a propagation round that
    /// narrows nothing leaves the flag clear.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }
}

impl GraphDomain for BoundedGraph {
    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn in_kernel(&self, node: u32) -> bool {
        self.kernel_mask.get(node as usize).copied().unwrap_or(false)
    }

    fn in_envelope(&self, node: u32) -> bool {
        self.envelope_mask
            .get(node as usize)
            .copied()
            .unwrap_or(false)
    }

    fn kernel_len(&self) -> usize {
        self.kernel.len()
    }

    fn envelope_len(&self) -> usize {
        self.envelope.len()
    }

    fn kernel_nodes(&self) -> Box<dyn Iterator<Item = u32> + '_> {
        Box::new(self.kernel.iter().copied())
    }

    fn envelope_nodes(&self) -> Box<dyn Iterator<Item = u32> + '_> {
        Box::new(self.envelope.iter().copied())
    }

    fn neighbors(&self, node: u32) -> &[u32] {
        self.graph.neighbors(node)
    }

    fn enforce_node(&mut self, node: u32) -> Result<bool, Contradiction> {
        if !self.in_envelope(node) {
            return Err(Contradiction::EnforceOutsideEnvelope { node });
        }
        if self.in_kernel(node) {
            return Ok(false);
        }
        self.kernel.insert(node);
        self.kernel_mask[node as usize] = true;
        self.changed = true;
        Ok(true)
    }

    fn remove_node(&mut self, node: u32) -> Result<bool, Contradiction> {
        if self.in_kernel(node) {
            return Err(Contradiction::RemoveKernelNode { node });
        }
        if !self.in_envelope(node) {
            return Ok(false);
        }
        self.envelope.swap_remove(&node);
        self.envelope_mask[node as usize] = false;
        self.changed = true;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_graph(n: usize) -> Arc<SpatialGraph> {
        let edges: Vec<(u32, u32)> = (0..n as u32 - 1).map(|i| (i, i + 1)).collect();
        Arc::new(SpatialGraph::from_edges(n, &edges).unwrap())
    }

    #[test]
    fn construction_validates_sets() {
        let g = path_graph(4);
        assert!(BoundedGraph::new(g.clone(), &[0], &[0, 1, 2]).is_ok());
        // Kernel node outside the envelope.
        assert!(matches!(
            BoundedGraph::new(g.clone(), &[3], &[0, 1, 2]),
            Err(BuildError::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            BoundedGraph::new(g, &[], &[7]),
            Err(BuildError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn enforce_and_remove_narrow_the_domain() {
        let mut d = BoundedGraph::full(path_graph(4));
        assert!(!d.take_changed());
        assert!(d.enforce_node(1).unwrap());
        assert!(!d.enforce_node(1).unwrap());
        assert!(d.remove_node(3).unwrap());
        assert!(!d.remove_node(3).unwrap());
        assert!(d.take_changed());
        assert!(!d.take_changed());
        assert_eq!(d.kernel_len(), 1);
        assert_eq!(d.envelope_len(), 3);
        assert!(d.in_kernel(1) && d.in_envelope(1));
        assert!(!d.in_envelope(3));
    }

    #[test]
    fn conflicting_operations_are_contradictions() {
        let mut d = BoundedGraph::full(path_graph(3));
        d.enforce_node(0).unwrap();
        assert_eq!(
            d.remove_node(0),
            Err(Contradiction::RemoveKernelNode { node: 0 })
        );
        d.remove_node(2).unwrap();
        assert_eq!(
            d.enforce_node(2),
            Err(Contradiction::EnforceOutsideEnvelope { node: 2 })
        );
    }

    #[test]
    fn determined_when_bounds_meet() {
        let g = path_graph(3);
        let mut d = BoundedGraph::new(g, &[0], &[0, 1]).unwrap();
        assert!(!d.is_determined());
        d.enforce_node(1).unwrap();
        assert!(d.is_determined());
    }

    #[test]
    fn out_of_range_membership_is_false() {
        let d = BoundedGraph::full(path_graph(2));
        assert!(!d.in_kernel(99));
        assert!(!d.in_envelope(99));
    }
}
