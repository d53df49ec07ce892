//! Topology-preservation filter.
//!
//! No selection may create a component disconnected from the patches
//! already committed: every envelope component without a kernel node is
//! unreachable from the committed selection, so all its nodes are pruned
//! from the envelope.

use relink_core::Contradiction;
use relink_filter::{Entailment, Filter, FilterError, PropagationContext};
use relink_graph::{Components, GraphDomain};

/// Prunes envelope nodes that could only form new, disconnected
/// components.
#[derive(Clone, Copy, Debug, Default)]
pub struct TopologyFilter;

impl TopologyFilter {
    /// Create the filter.
    pub fn new() -> Self {
        Self
    }
}

impl Filter for TopologyFilter {
    fn name(&self) -> &str {
        "TopologyPreservation"
    }

    fn propagate(&self, ctx: &mut PropagationContext<'_>) -> Result<(), FilterError> {
        let env = Components::of_envelope(ctx.graph(), |_| 0.0);
        let mut stranded: Vec<u32> = Vec::new();
        {
            let graph = ctx.graph();
            for v in graph.envelope_nodes() {
                if graph.in_kernel(v) {
                    continue;
                }
                if let Some(c) = env.components().component_of(v) {
                    if !env.has_kernel(c) {
                        stranded.push(v);
                    }
                }
            }
        }
        for v in stranded {
            ctx.graph_mut().remove_node(v)?;
        }
        // A kernel node whose envelope component holds no kernel node can
        // only come from a domain whose two bounds disagree; the domain
        // is wiped out either way.
        for v in ctx.graph().kernel_nodes() {
            let reachable = env
                .components()
                .component_of(v)
                .is_some_and(|c| env.has_kernel(c));
            if !reachable {
                return Err(Contradiction::UnreachableKernelNode { node: v }.into());
            }
        }
        Ok(())
    }

    fn entailment(&self, ctx: &PropagationContext<'_>) -> Entailment {
        let env = Components::of_envelope(ctx.graph(), |_| 0.0);
        let graph = ctx.graph();
        for v in graph.kernel_nodes() {
            let reachable = env
                .components()
                .component_of(v)
                .is_some_and(|c| env.has_kernel(c));
            if !reachable {
                return Entailment::Violated;
            }
        }
        if graph.is_determined() {
            return Entailment::Satisfied;
        }
        Entailment::Undetermined
    }
}
