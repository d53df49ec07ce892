//! The host-facing contract of a bounded graph domain.

use relink_core::Contradiction;

/// A graph whose node set is bounded below by a *kernel* (nodes known to
/// be present) and above by an *envelope* (nodes that may still be
/// present).
///
/// The invariant `kernel ⊆ envelope` holds at all times; edges are the
/// node-induced restriction of a fixed spatial adjacency. Filters may
/// only grow the kernel ([`enforce_node`](Self::enforce_node)) or shrink
/// the envelope ([`remove_node`](Self::remove_node)); both report whether
/// the domain changed, and both raise a [`Contradiction`] when the
/// request conflicts with the other bound.
///
/// # Object safety
///
/// The trait is designed for use as `&mut dyn GraphDomain` inside a
/// propagation context, so a host solver can supply its own trailed
/// domain representation.
pub trait GraphDomain {
    /// Size of the node universe (envelope and kernel indices live in
    /// `0..node_count()`).
    fn node_count(&self) -> usize;

    /// `true` if `node` is known present.
    fn in_kernel(&self, node: u32) -> bool;

    /// `true` if `node` may still be present.
    fn in_envelope(&self, node: u32) -> bool;

    /// Number of kernel nodes.
    fn kernel_len(&self) -> usize;

    /// Number of envelope nodes.
    fn envelope_len(&self) -> usize;

    /// Iterate the kernel nodes in a deterministic order.
    fn kernel_nodes(&self) -> Box<dyn Iterator<Item = u32> + '_>;

    /// Iterate the envelope nodes in a deterministic order.
    fn envelope_nodes(&self) -> Box<dyn Iterator<Item = u32> + '_>;

    /// Adjacency of `node` in the underlying spatial graph.
    ///
    /// Callers filter endpoints by membership to obtain the kernel or
    /// envelope subgraph.
    fn neighbors(&self, node: u32) -> &[u32];

    /// Move `node` from envelope-only to the kernel.
    fn enforce_node(&mut self, node: u32) -> Result<bool, Contradiction>;

    /// Drop `node` from the envelope.
    fn remove_node(&mut self, node: u32) -> Result<bool, Contradiction>;

    /// `true` once kernel and envelope coincide.
    fn is_determined(&self) -> bool {
        self.kernel_len() == self.envelope_len()
    }
}
