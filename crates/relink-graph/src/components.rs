//! Connected-component labeling.
//!
//! One labeling pass partitions the present nodes of a graph snapshot
//! into components, aggregating a node count (`size`) and a caller-chosen
//! per-node weight (`attribute`) per component. The traversal is an
//! iterative multi-source FIFO flood fill in O(V+E); member nodes are
//! threaded through an embedded first/next linked list so enumeration
//! allocates nothing.
//!
//! A labeling is a snapshot: it stays valid only until the underlying
//! domain changes, and every propagation call recomputes it from scratch.

use crate::domain::GraphDomain;
use crate::graph::SpatialGraph;
use relink_core::BuildError;
use relink_grid::{Neighborhood, PartialGrid};
use smallvec::SmallVec;
use std::collections::VecDeque;

/// Sentinel for "not in any component" / end of a member list.
const NONE: u32 = u32::MAX;

/// A partition of present nodes into connected components.
#[derive(Clone, Debug)]
pub struct Components {
    label: Vec<u32>,
    size: Vec<u32>,
    attribute: Vec<f64>,
    first: Vec<u32>,
    next: Vec<u32>,
}

/// Envelope labeling cross-referenced against the kernel.
///
/// Produced by [`Components::of_envelope`]: the components of the
/// permissive (envelope) graph, plus a flag per component recording
/// whether it contains at least one kernel node.
#[derive(Clone, Debug)]
pub struct BoundedComponents {
    components: Components,
    has_kernel: Vec<bool>,
}

impl Components {
    fn label_with(
        node_count: usize,
        seeds: &mut dyn Iterator<Item = u32>,
        present: &dyn Fn(u32) -> bool,
        neighbors: &dyn Fn(u32, &mut dyn FnMut(u32)),
        weight: &dyn Fn(u32) -> f64,
    ) -> Self {
        let mut label = vec![NONE; node_count];
        let mut next = vec![NONE; node_count];
        let mut size = Vec::new();
        let mut attribute = Vec::new();
        let mut first = Vec::new();
        let mut queue: VecDeque<u32> = VecDeque::new();
        for seed in seeds {
            if !present(seed) || label[seed as usize] != NONE {
                continue;
            }
            let comp = size.len() as u32;
            label[seed as usize] = comp;
            first.push(seed);
            size.push(0);
            attribute.push(0.0);
            let mut tail = seed;
            queue.push_back(seed);
            while let Some(node) = queue.pop_front() {
                size[comp as usize] += 1;
                attribute[comp as usize] += weight(node);
                let mut visit = |nb: u32| {
                    if present(nb) && label[nb as usize] == NONE {
                        label[nb as usize] = comp;
                        next[tail as usize] = nb;
                        tail = nb;
                        queue.push_back(nb);
                    }
                };
                neighbors(node, &mut visit);
            }
        }
        Self {
            label,
            size,
            attribute,
            first,
            next,
        }
    }

    /// Label the cells of `grid` whose raster value equals `target`.
    ///
    /// `values` is indexed by complete cell; the labeling is expressed in
    /// partial indices. Adjacency under `nbh` is materialized once before
    /// the fill; each matching cell contributes weight 1, so `size` and
    /// `attribute` agree.
    pub fn of_raster(
        grid: &PartialGrid,
        nbh: &dyn Neighborhood,
        values: &[i32],
        target: i32,
    ) -> Result<Self, BuildError> {
        let complete = grid.grid().cell_count();
        if values.len() != complete {
            return Err(BuildError::LengthMismatch {
                name: "values",
                expected: complete,
                actual: values.len(),
            });
        }
        let n = grid.cell_count();
        let matching: Vec<bool> = (0..n as u32)
            .map(|p| {
                grid.complete_index(p)
                    .is_some_and(|c| values[c as usize] == target)
            })
            .collect();
        let adjacency: Vec<SmallVec<[u32; 8]>> = (0..n as u32)
            .map(|p| {
                if matching[p as usize] {
                    grid.neighbors(nbh, p)
                        .into_iter()
                        .filter(|&q| matching[q as usize])
                        .collect()
                } else {
                    SmallVec::new()
                }
            })
            .collect();
        Ok(Self::label_with(
            n,
            &mut (0..n as u32),
            &|p| matching[p as usize],
            &|p: u32, visit: &mut dyn FnMut(u32)| {
                for &q in &adjacency[p as usize] {
                    visit(q);
                }
            },
            &|_| 1.0,
        ))
    }

    /// Label the subgraph of `graph` induced by `nodes`.
    pub fn of_subgraph(
        graph: &SpatialGraph,
        nodes: &[u32],
        weight: impl Fn(u32) -> f64,
    ) -> Result<Self, BuildError> {
        let n = graph.node_count();
        let mut present = vec![false; n];
        for &node in nodes {
            if node as usize >= n {
                return Err(BuildError::IndexOutOfRange {
                    name: "node",
                    index: node as usize,
                    count: n,
                });
            }
            present[node as usize] = true;
        }
        Ok(Self::label_with(
            n,
            &mut nodes.iter().copied(),
            &|v| present[v as usize],
            &|v: u32, visit: &mut dyn FnMut(u32)| {
                for &w in graph.neighbors(v) {
                    visit(w);
                }
            },
            &weight,
        ))
    }

    /// Label the determined (kernel) subgraph of a domain.
    pub fn of_kernel(domain: &dyn GraphDomain, weight: impl Fn(u32) -> f64) -> Self {
        Self::label_with(
            domain.node_count(),
            &mut domain.kernel_nodes(),
            &|v| domain.in_kernel(v),
            &|v: u32, visit: &mut dyn FnMut(u32)| {
                for &w in domain.neighbors(v) {
                    visit(w);
                }
            },
            &weight,
        )
    }

    /// Label the permissive (envelope) graph of a domain and record which
    /// components contain at least one kernel node.
    pub fn of_envelope(domain: &dyn GraphDomain, weight: impl Fn(u32) -> f64) -> BoundedComponents {
        let components = Self::label_with(
            domain.node_count(),
            &mut domain.envelope_nodes(),
            &|v| domain.in_envelope(v),
            &|v: u32, visit: &mut dyn FnMut(u32)| {
                for &w in domain.neighbors(v) {
                    visit(w);
                }
            },
            &weight,
        );
        let mut has_kernel = vec![false; components.count() as usize];
        for node in domain.kernel_nodes() {
            if let Some(c) = components.component_of(node) {
                has_kernel[c as usize] = true;
            }
        }
        BoundedComponents {
            components,
            has_kernel,
        }
    }

    /// Number of components.
    pub fn count(&self) -> u32 {
        self.size.len() as u32
    }

    /// Node count per component.
    pub fn sizes(&self) -> &[u32] {
        &self.size
    }

    /// Aggregated attribute per component.
    pub fn attributes(&self) -> &[f64] {
        &self.attribute
    }

    /// Component of `node`, or `None` when the node is absent.
    pub fn component_of(&self, node: u32) -> Option<u32> {
        match self.label.get(node as usize) {
            Some(&NONE) | None => None,
            Some(&c) => Some(c),
        }
    }

    /// Iterate the member nodes of one component, in discovery order.
    pub fn members(&self, component: u32) -> Members<'_> {
        let cur = self
            .first
            .get(component as usize)
            .copied()
            .unwrap_or(NONE);
        Members {
            next: &self.next,
            cur,
        }
    }

    /// Convert the labeling into grouped-grid construction input:
    /// `Some(component)` per labeled node, `None` per absent node.
    pub fn grouping_labels(&self) -> (Vec<Option<u32>>, u32) {
        let labels = self
            .label
            .iter()
            .map(|&l| if l == NONE { None } else { Some(l) })
            .collect();
        (labels, self.count())
    }
}

impl BoundedComponents {
    /// The envelope labeling itself.
    pub fn components(&self) -> &Components {
        &self.components
    }

    /// `true` if envelope component `c` contains a kernel node.
    pub fn has_kernel(&self, component: u32) -> bool {
        self.has_kernel
            .get(component as usize)
            .copied()
            .unwrap_or(false)
    }
}

/// Iterator over one component's member nodes.
pub struct Members<'a> {
    next: &'a [u32],
    cur: u32,
}

impl Iterator for Members<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.cur == NONE {
            return None;
        }
        let node = self.cur;
        self.cur = self.next[node as usize];
        Some(node)
    }
}
