//! Integral index of connectivity filter.
//!
//! `IIC = (Σ_{i,j} attr(i)·attr(j) / (1 + dist(i,j))) / A²` over the
//! patches (components) of a graph, where `dist` counts hops in the
//! inter-patch adjacency graph: two patches are adjacent when any pair of
//! their member cells lies within a distance threshold. Unreachable
//! pairs contribute nothing; the `i == j` term contributes `attr(i)²`.
//!
//! Patch distances are computed by one FIFO BFS per source patch over
//! the inter-patch graph. The cell-pair threshold test is memoized in a
//! lazily-filled table owned by the filter; grid geometry never changes
//! after construction, so cached entries stay valid.
//!
//! Bound handling mirrors the mesh filter (envelope value above, kernel
//! value below when applicable, enforce-all when the lower bound meets
//! the envelope value); there is no dominance cut, as graph construction
//! cost dominates here.

use crate::circle::Point;
use relink_core::fixed;
use relink_core::{BuildError, IntVar, IntVarId};
use relink_filter::{Entailment, Filter, FilterError, PropagationContext};
use relink_graph::{Components, GraphDomain};
use relink_grid::GroupedGrid;
use std::cell::RefCell;
use std::collections::VecDeque;

/// Tri-state memo entries.
const UNKNOWN: u8 = 0;
const WITHIN: u8 = 1;
const BEYOND: u8 = 2;

/// Lazily-filled node-pair threshold table.
///
/// One entry per ordered node pair; both orders are written together so
/// each pair is computed once.
struct ThresholdMemo {
    table: RefCell<Vec<u8>>,
    n: usize,
}

impl ThresholdMemo {
    fn new(n: usize) -> Self {
        Self {
            table: RefCell::new(vec![UNKNOWN; n * n]),
            n,
        }
    }

    fn within(&self, a: u32, b: u32, cells: &[Vec<Point>], threshold: f64) -> bool {
        let idx = a as usize * self.n + b as usize;
        let cached = self.table.borrow()[idx];
        if cached != UNKNOWN {
            return cached == WITHIN;
        }
        let hit = cells[a as usize].iter().any(|&p| {
            cells[b as usize]
                .iter()
                .any(|&q| p.distance(q) <= threshold)
        });
        let mut table = self.table.borrow_mut();
        let value = if hit { WITHIN } else { BEYOND };
        table[idx] = value;
        table[b as usize * self.n + a as usize] = value;
        hit
    }
}

/// IIC of a labeled graph snapshot.
///
/// `node_cells` holds the member cell centers of each node; `threshold`
/// is the inter-patch adjacency distance. Used for reporting the initial
/// index of a static graph; the filter itself uses the same computation
/// through its memo.
pub fn integral_index_of_connectivity(
    components: &Components,
    node_cells: &[Vec<Point>],
    threshold: f64,
    landscape_area: f64,
) -> Result<f64, BuildError> {
    if !(threshold > 0.0) {
        return Err(BuildError::NonPositive {
            name: "threshold",
            value: threshold,
        });
    }
    if !(landscape_area > 0.0) {
        return Err(BuildError::NonPositive {
            name: "landscape_area",
            value: landscape_area,
        });
    }
    let memo = ThresholdMemo::new(node_cells.len());
    Ok(iic_value(
        components,
        node_cells,
        threshold,
        landscape_area,
        &memo,
    ))
}

/// Shared IIC computation over patches of one labeling.
fn iic_value(
    components: &Components,
    node_cells: &[Vec<Point>],
    threshold: f64,
    landscape_area: f64,
    memo: &ThresholdMemo,
) -> f64 {
    let p = components.count() as usize;
    if p == 0 {
        return 0.0;
    }
    let patch_nodes: Vec<Vec<u32>> = (0..p as u32)
        .map(|c| components.members(c).collect())
        .collect();
    // Inter-patch adjacency from the cell-pair threshold test.
    let mut adjacent: Vec<Vec<u32>> = vec![Vec::new(); p];
    for i in 0..p {
        for j in i + 1..p {
            let touching = patch_nodes[i].iter().any(|&a| {
                patch_nodes[j]
                    .iter()
                    .any(|&b| memo.within(a, b, node_cells, threshold))
            });
            if touching {
                adjacent[i].push(j as u32);
                adjacent[j].push(i as u32);
            }
        }
    }
    // All-pairs hop distances by repeated single-source BFS.
    let attrs = components.attributes();
    let mut total = 0.0;
    let mut dist = vec![u32::MAX; p];
    let mut queue: VecDeque<u32> = VecDeque::new();
    for src in 0..p {
        dist.fill(u32::MAX);
        dist[src] = 0;
        queue.push_back(src as u32);
        while let Some(i) = queue.pop_front() {
            for &j in &adjacent[i as usize] {
                if dist[j as usize] == u32::MAX {
                    dist[j as usize] = dist[i as usize] + 1;
                    queue.push_back(j);
                }
            }
        }
        for (tgt, &d) in dist.iter().enumerate() {
            if d != u32::MAX {
                total += attrs[src] * attrs[tgt] / (1.0 + d as f64);
            }
        }
    }
    total / (landscape_area * landscape_area)
}

/// Bound-propagation filter for the integral index of connectivity.
pub struct IicFilter {
    var: IntVarId,
    weights: Vec<f64>,
    node_cells: Vec<Vec<Point>>,
    threshold: f64,
    landscape_area: f64,
    precision: u32,
    maximize: bool,
    memo: ThresholdMemo,
}

/// Builder for [`IicFilter`].
///
/// Required: `var`, node geometry (via [`grid`](IicFilterBuilder::grid)
/// or explicit [`node_cells`](IicFilterBuilder::node_cells) plus
/// [`weights`](IicFilterBuilder::weights)), and `landscape_area`.
pub struct IicFilterBuilder {
    var: Option<IntVarId>,
    weights: Vec<f64>,
    node_cells: Vec<Vec<Point>>,
    threshold: f64,
    landscape_area: Option<f64>,
    precision: u32,
    maximize: bool,
}

impl IicFilter {
    /// Create a new builder.
    pub fn builder() -> IicFilterBuilder {
        IicFilterBuilder {
            var: None,
            weights: Vec::new(),
            node_cells: Vec::new(),
            threshold: 1.0,
            landscape_area: None,
            precision: 4,
            maximize: false,
        }
    }

    fn var_mut<'c>(
        &self,
        ctx: &'c mut PropagationContext<'_>,
    ) -> Result<&'c mut IntVar, FilterError> {
        ctx.vars_mut()
            .int_mut(self.var)
            .ok_or_else(|| FilterError::UnknownVariable {
                filter: self.name().into(),
            })
    }

    fn check_shape(&self, ctx: &PropagationContext<'_>) -> Result<(), FilterError> {
        let actual = ctx.graph().node_count();
        if self.weights.len() != actual {
            return Err(FilterError::ShapeMismatch {
                filter: self.name().into(),
                expected: self.weights.len(),
                actual,
            });
        }
        Ok(())
    }

    fn iic(&self, components: &Components) -> f64 {
        iic_value(
            components,
            &self.node_cells,
            self.threshold,
            self.landscape_area,
            &self.memo,
        )
    }
}

impl IicFilterBuilder {
    /// Set the bound variable holding the scaled index.
    pub fn var(mut self, var: IntVarId) -> Self {
        self.var = Some(var);
        self
    }

    /// Take node weights and member cell centers from a grouped grid.
    pub fn grid(mut self, grid: &GroupedGrid) -> Self {
        let n = grid.node_count() as u32;
        self.weights = (0..n)
            .map(|v| grid.node_size(v).unwrap_or(0) as f64)
            .collect();
        self.node_cells = (0..n)
            .map(|v| {
                grid.cells_of(v)
                    .iter()
                    .filter_map(|&cell| grid.partial().cartesian(cell))
                    .map(|(x, y)| Point::new(x, y))
                    .collect()
            })
            .collect();
        self
    }

    /// Set the per-node aggregation weights explicitly.
    pub fn weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = weights;
        self
    }

    /// Set the member cell centers of each node explicitly.
    pub fn node_cells(mut self, node_cells: Vec<Vec<Point>>) -> Self {
        self.node_cells = node_cells;
        self
    }

    /// Set the inter-patch adjacency distance threshold (default 1.0).
    /// Must be positive.
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the landscape area dividing the index (squared). Must be
    /// positive.
    pub fn landscape_area(mut self, area: f64) -> Self {
        self.landscape_area = Some(area);
        self
    }

    /// Set the fixed-point precision (default 4).
    pub fn precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    /// Declare that the host maximizes the index (default: not).
    pub fn maximize(mut self, maximize: bool) -> Self {
        self.maximize = maximize;
        self
    }

    /// Build the filter, validating all configuration.
    pub fn build(self) -> Result<IicFilter, BuildError> {
        let var = self.var.ok_or(BuildError::MissingParameter { name: "var" })?;
        if self.weights.is_empty() {
            return Err(BuildError::MissingParameter { name: "weights" });
        }
        if self.node_cells.len() != self.weights.len() {
            return Err(BuildError::LengthMismatch {
                name: "node_cells",
                expected: self.weights.len(),
                actual: self.node_cells.len(),
            });
        }
        if !(self.threshold > 0.0) {
            return Err(BuildError::NonPositive {
                name: "threshold",
                value: self.threshold,
            });
        }
        let landscape_area = self
            .landscape_area
            .ok_or(BuildError::MissingParameter {
                name: "landscape_area",
            })?;
        if !(landscape_area > 0.0) {
            return Err(BuildError::NonPositive {
                name: "landscape_area",
                value: landscape_area,
            });
        }
        fixed::check_precision(self.precision)?;
        let memo = ThresholdMemo::new(self.weights.len());
        Ok(IicFilter {
            var,
            weights: self.weights,
            node_cells: self.node_cells,
            threshold: self.threshold,
            landscape_area,
            precision: self.precision,
            maximize: self.maximize,
            memo,
        })
    }
}

impl Filter for IicFilter {
    fn name(&self) -> &str {
        "IntegralIndexOfConnectivity"
    }

    fn propagate(&self, ctx: &mut PropagationContext<'_>) -> Result<(), FilterError> {
        self.check_shape(ctx)?;
        let weight = |v: u32| self.weights[v as usize];
        let env = Components::of_envelope(ctx.graph(), weight);
        let ub_scaled = fixed::scaled(self.iic(env.components()), self.precision);
        let determined = ctx.graph().is_determined();

        if !self.maximize || determined {
            let kernel = Components::of_kernel(ctx.graph(), weight);
            let lb_scaled = fixed::scaled(self.iic(&kernel), self.precision);
            self.var_mut(ctx)?.update_lower_bound(lb_scaled)?;
        }
        let var = self.var_mut(ctx)?;
        var.update_upper_bound(ub_scaled)?;
        let lo = var.lo();

        if lo == ub_scaled {
            let graph = ctx.graph();
            let pending: Vec<u32> = graph
                .envelope_nodes()
                .filter(|&v| !graph.in_kernel(v))
                .collect();
            for v in pending {
                ctx.graph_mut().enforce_node(v)?;
            }
            self.var_mut(ctx)?.instantiate_to(ub_scaled)?;
        }
        Ok(())
    }

    fn entailment(&self, ctx: &PropagationContext<'_>) -> Entailment {
        if self.check_shape(ctx).is_err() {
            return Entailment::Undetermined;
        }
        let Some(var) = ctx.vars().int(self.var) else {
            return Entailment::Undetermined;
        };
        let weight = |v: u32| self.weights[v as usize];
        let env = Components::of_envelope(ctx.graph(), weight);
        let ub_scaled = fixed::scaled(self.iic(env.components()), self.precision);
        let kernel = Components::of_kernel(ctx.graph(), weight);
        let lb_scaled = fixed::scaled(self.iic(&kernel), self.precision);
        if ctx.graph().is_determined() {
            return if lb_scaled >= var.lo() && lb_scaled <= var.hi() {
                Entailment::Satisfied
            } else {
                Entailment::Violated
            };
        }
        if ub_scaled < var.lo() || lb_scaled > var.hi() {
            return Entailment::Violated;
        }
        Entailment::Undetermined
    }
}
