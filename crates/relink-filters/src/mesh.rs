//! Effective mesh size filter.
//!
//! The effective mesh size of a graph is `Σ attr(c)² / A` over its
//! components, where `attr` aggregates per-node cell counts and `A` is
//! the landscape area. The filter tightens an integer bound variable
//! holding the index scaled by `10^precision`:
//!
//! - the permissive (envelope) graph always yields an upper bound;
//! - the determined (kernel) graph yields a lower bound, applied when
//!   the filter is not maximizing or the domain is fully determined;
//! - when the variable's lower bound meets the envelope value, only the
//!   maximal configuration can achieve it: every envelope node is
//!   enforced and the variable is pinned;
//! - otherwise a dominance cut enforces whole components whose partial
//!   exclusion would provably push the index below the lower bound.

use relink_core::fixed;
use relink_core::{BuildError, IntVar, IntVarId};
use relink_filter::{Entailment, Filter, FilterError, PropagationContext};
use relink_graph::{Components, GraphDomain};

/// Effective mesh size of a labeled graph snapshot.
///
/// Used both inside [`MeshFilter`] and for reporting the initial,
/// pre-optimization index of a static graph.
pub fn effective_mesh_size(
    components: &Components,
    landscape_area: f64,
) -> Result<f64, BuildError> {
    if !(landscape_area > 0.0) {
        return Err(BuildError::NonPositive {
            name: "landscape_area",
            value: landscape_area,
        });
    }
    let sum: f64 = components.attributes().iter().map(|a| a * a).sum();
    Ok(sum / landscape_area)
}

/// Bound-propagation filter for the effective mesh size index.
#[derive(Clone, Debug)]
pub struct MeshFilter {
    var: IntVarId,
    weights: Vec<f64>,
    landscape_area: f64,
    precision: u32,
    maximize: bool,
}

/// Builder for [`MeshFilter`].
///
/// Required: `var`, `weights`, `landscape_area`.
pub struct MeshFilterBuilder {
    var: Option<IntVarId>,
    weights: Vec<f64>,
    landscape_area: Option<f64>,
    precision: u32,
    maximize: bool,
}

impl MeshFilter {
    /// Create a new builder.
    pub fn builder() -> MeshFilterBuilder {
        MeshFilterBuilder {
            var: None,
            weights: Vec::new(),
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

    fn mesh(&self, components: &Components) -> f64 {
        let sum: f64 = components.attributes().iter().map(|a| a * a).sum();
        sum / self.landscape_area
    }
}

impl MeshFilterBuilder {
    /// Set the bound variable holding the scaled index.
    pub fn var(mut self, var: IntVarId) -> Self {
        self.var = Some(var);
        self
    }

    /// Set the per-node aggregation weights (cell counts).
    pub fn weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = weights;
        self
    }

    /// Set the landscape area dividing the index. Must be positive.
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
    ///
    /// When maximizing, the kernel value is not a sound lower bound on
    /// the optimum and is only applied once the domain is determined.
    pub fn maximize(mut self, maximize: bool) -> Self {
        self.maximize = maximize;
        self
    }

    /// Build the filter, validating all configuration.
    pub fn build(self) -> Result<MeshFilter, BuildError> {
        let var = self.var.ok_or(BuildError::MissingParameter { name: "var" })?;
        if self.weights.is_empty() {
            return Err(BuildError::MissingParameter { name: "weights" });
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
        Ok(MeshFilter {
            var,
            weights: self.weights,
            landscape_area,
            precision: self.precision,
            maximize: self.maximize,
        })
    }
}

impl Filter for MeshFilter {
    fn name(&self) -> &str {
        "EffectiveMeshSize"
    }

    fn propagate(&self, ctx: &mut PropagationContext<'_>) -> Result<(), FilterError> {
        self.check_shape(ctx)?;
        let weight = |v: u32| self.weights[v as usize];
        let env = Components::of_envelope(ctx.graph(), weight);
        let ub_scaled = fixed::scaled(self.mesh(env.components()), self.precision);
        let determined = ctx.graph().is_determined();

        if !self.maximize || determined {
            let kernel = Components::of_kernel(ctx.graph(), weight);
            let lb_scaled = fixed::scaled(self.mesh(&kernel), self.precision);
            self.var_mut(ctx)?.update_lower_bound(lb_scaled)?;
        }
        let var = self.var_mut(ctx)?;
        var.update_upper_bound(ub_scaled)?;
        let lo = var.lo();

        if lo == ub_scaled {
            // Only the maximal configuration reaches the bound.
            let graph = ctx.graph();
            let pending: Vec<u32> = graph
                .envelope_nodes()
                .filter(|&v| !graph.in_kernel(v))
                .collect();
            for v in pending {
                ctx.graph_mut().enforce_node(v)?;
            }
            self.var_mut(ctx)?.instantiate_to(ub_scaled)?;
            return Ok(());
        }

        // Dominance cut: excluding any member of component c lowers the
        // envelope index by at least the marginal delta of its lightest
        // uncommitted member; if that already undercuts the variable's
        // lower bound, the whole component is mandatory.
        let mesh_ub = self.mesh(env.components());
        let mut mandatory: Vec<u32> = Vec::new();
        {
            let graph = ctx.graph();
            for c in 0..env.components().count() {
                let mut margin = f64::INFINITY;
                for m in env.components().members(c) {
                    if !graph.in_kernel(m) {
                        margin = margin.min(self.weights[m as usize]);
                    }
                }
                if margin.is_infinite() {
                    continue;
                }
                let attr = env.components().attributes()[c as usize];
                let delta = (attr * attr - (attr - margin) * (attr - margin)) / self.landscape_area;
                if fixed::scaled(mesh_ub - delta, self.precision) < lo {
                    mandatory.extend(
                        env.components()
                            .members(c)
                            .filter(|&m| !graph.in_kernel(m)),
                    );
                }
            }
        }
        for v in mandatory {
            ctx.graph_mut().enforce_node(v)?;
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
        let ub_scaled = fixed::scaled(self.mesh(env.components()), self.precision);
        let kernel = Components::of_kernel(ctx.graph(), weight);
        let lb_scaled = fixed::scaled(self.mesh(&kernel), self.precision);
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
