//! Compactness filter: smallest enclosing circle of the selection.
//!
//! Three real bound variables (center x, center y, radius) describe
//! the minimal circle enclosing every selected point. Per propagation:
//!
//! 1. An empty envelope point set is only satisfiable with a zero radius
//!    lower bound.
//! 2. A determined domain pins all three variables to the exact circle.
//! 3. Otherwise the kernel circle is checked against the radius upper
//!    bound, and every envelope-only point is pruned when it provably
//!    cannot join any circle within bounds: either by the
//!    triangle-inequality short-circuit on its distance to the kernel
//!    center, or because tentatively extending the kernel circle through
//!    it leaves the radius interval.

use crate::circle::{EnclosingCircle, Point};
use relink_core::{BuildError, Contradiction, RealVar, RealVarId};
use relink_filter::{Entailment, Filter, FilterError, PropagationContext};
use relink_graph::GraphDomain;
use std::time::{SystemTime, UNIX_EPOCH};

/// Bound-propagation filter for the minimal enclosing circle.
#[derive(Clone, Debug)]
pub struct CompactnessFilter {
    center_x: RealVarId,
    center_y: RealVarId,
    radius: RealVarId,
    points: Vec<Point>,
    seed: u64,
}

/// Builder for [`CompactnessFilter`].
///
/// Required: the three circle variables and the per-node point table.
pub struct CompactnessFilterBuilder {
    center_x: Option<RealVarId>,
    center_y: Option<RealVarId>,
    radius: Option<RealVarId>,
    points: Vec<Point>,
    seed: Option<u64>,
}

impl CompactnessFilter {
    /// Create a new builder.
    pub fn builder() -> CompactnessFilterBuilder {
        CompactnessFilterBuilder {
            center_x: None,
            center_y: None,
            radius: None,
            points: Vec::new(),
            seed: None,
        }
    }

    fn check_shape(&self, ctx: &PropagationContext<'_>) -> Result<(), FilterError> {
        let actual = ctx.graph().node_count();
        if self.points.len() != actual {
            return Err(FilterError::ShapeMismatch {
                filter: self.name().into(),
                expected: self.points.len(),
                actual,
            });
        }
        Ok(())
    }

    fn real(
        &self,
        ctx: &PropagationContext<'_>,
        id: RealVarId,
    ) -> Result<RealVar, FilterError> {
        ctx.vars()
            .real(id)
            .copied()
            .ok_or_else(|| FilterError::UnknownVariable {
                filter: self.name().into(),
            })
    }

    fn kernel_points(&self, ctx: &PropagationContext<'_>) -> Vec<Point> {
        ctx.graph()
            .kernel_nodes()
            .map(|v| self.points[v as usize])
            .collect()
    }
}

impl CompactnessFilterBuilder {
    /// Set the center-x variable.
    pub fn center_x(mut self, id: RealVarId) -> Self {
        self.center_x = Some(id);
        self
    }

    /// Set the center-y variable.
    pub fn center_y(mut self, id: RealVarId) -> Self {
        self.center_y = Some(id);
        self
    }

    /// Set the radius variable.
    pub fn radius(mut self, id: RealVarId) -> Self {
        self.radius = Some(id);
        self
    }

    /// Set the per-node point table (one point per graph node).
    pub fn points(mut self, points: Vec<Point>) -> Self {
        self.points = points;
        self
    }

    /// Set the shuffle seed, making propagation order reproducible.
    ///
    /// Without it the seed is drawn from the clock at build time.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the filter, validating all configuration.
    pub fn build(self) -> Result<CompactnessFilter, BuildError> {
        let center_x = self.center_x.ok_or(BuildError::MissingParameter {
            name: "center_x",
        })?;
        let center_y = self.center_y.ok_or(BuildError::MissingParameter {
            name: "center_y",
        })?;
        let radius = self
            .radius
            .ok_or(BuildError::MissingParameter { name: "radius" })?;
        if self.points.is_empty() {
            return Err(BuildError::MissingParameter { name: "points" });
        }
        let seed = self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0x5EED)
        });
        Ok(CompactnessFilter {
            center_x,
            center_y,
            radius,
            points: self.points,
            seed,
        })
    }
}

impl Filter for CompactnessFilter {
    fn name(&self) -> &str {
        "Compactness"
    }

    fn propagate(&self, ctx: &mut PropagationContext<'_>) -> Result<(), FilterError> {
        self.check_shape(ctx)?;
        let radius = self.real(ctx, self.radius)?;

        if ctx.graph().envelope_len() == 0 {
            if radius.lo() > radius.eps() {
                return Err(Contradiction::EmptyEnvelopeWithRadius {
                    radius_lo: radius.lo(),
                }
                .into());
            }
            return Ok(());
        }

        let kernel_points = self.kernel_points(ctx);

        if ctx.graph().is_determined() {
            let ec = EnclosingCircle::with_seed(&kernel_points, self.seed);
            let Some(c) = ec.circle() else {
                return Ok(());
            };
            let ids = [
                (self.center_x, c.center.x),
                (self.center_y, c.center.y),
                (self.radius, c.radius),
            ];
            for (id, value) in ids {
                ctx.vars_mut()
                    .real_mut(id)
                    .ok_or_else(|| FilterError::UnknownVariable {
                        filter: self.name().into(),
                    })?
                    .instantiate_to(value)?;
            }
            return Ok(());
        }

        if kernel_points.is_empty() {
            return Ok(());
        }
        let ec = EnclosingCircle::with_seed(&kernel_points, self.seed);
        let Some(kernel_circle) = ec.circle() else {
            return Ok(());
        };
        if kernel_circle.radius > radius.hi() + radius.eps() {
            return Err(Contradiction::RealBound {
                attempted: kernel_circle.radius,
                lo: radius.lo(),
                hi: radius.hi(),
            }
            .into());
        }

        let mut pruned: Vec<u32> = Vec::new();
        {
            let graph = ctx.graph();
            for v in graph.envelope_nodes() {
                if graph.in_kernel(v) {
                    continue;
                }
                let p = self.points[v as usize];
                let d = p.distance(kernel_circle.center);
                // Beyond the radius bound and beyond any circle that
                // still covers the kernel: the triangle inequality rules
                // the point out without touching the circle.
                if d > radius.hi() + radius.eps()
                    && d > kernel_circle.radius + 2.0 * radius.hi() + radius.eps()
                {
                    pruned.push(v);
                    continue;
                }
                if kernel_points.len() >= 2 {
                    let extended = ec.extended_radius(p);
                    if extended > radius.hi() + radius.eps()
                        || extended < radius.lo() - radius.eps()
                    {
                        pruned.push(v);
                    }
                }
            }
        }
        for v in pruned {
            ctx.graph_mut().remove_node(v)?;
        }
        Ok(())
    }

    fn entailment(&self, ctx: &PropagationContext<'_>) -> Entailment {
        if self.check_shape(ctx).is_err() {
            return Entailment::Undetermined;
        }
        let Ok(radius) = self.real(ctx, self.radius) else {
            return Entailment::Undetermined;
        };
        if ctx.graph().envelope_len() == 0 {
            return if radius.lo() > radius.eps() {
                Entailment::Violated
            } else {
                Entailment::Satisfied
            };
        }
        let kernel_points = self.kernel_points(ctx);
        if ctx.graph().is_determined() {
            let Some(c) = EnclosingCircle::with_seed(&kernel_points, self.seed).circle() else {
                return Entailment::Satisfied;
            };
            let (Ok(cx), Ok(cy)) = (
                self.real(ctx, self.center_x),
                self.real(ctx, self.center_y),
            ) else {
                return Entailment::Undetermined;
            };
            return if radius.contains(c.radius)
                && cx.contains(c.center.x)
                && cy.contains(c.center.y)
            {
                Entailment::Satisfied
            } else {
                Entailment::Violated
            };
        }
        if let Some(c) = EnclosingCircle::with_seed(&kernel_points, self.seed).circle() {
            if c.radius > radius.hi() + radius.eps() {
                return Entailment::Violated;
            }
        }
        Entailment::Undetermined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relink_core::VarStore;
    use relink_graph::{BoundedGraph, GraphDomain, SpatialGraph};
    use std::sync::Arc;

    const EPS: f64 = 1e-6;

    fn complete_graph(n: usize) -> Arc<SpatialGraph> {
        let mut edges = Vec::new();
        for a in 0..n as u32 {
            for b in a + 1..n as u32 {
                edges.push((a, b));
            }
        }
        Arc::new(SpatialGraph::from_edges(n, &edges).unwrap())
    }

    fn circle_vars(vars: &mut VarStore, r_lo: f64, r_hi: f64) -> (RealVarId, RealVarId, RealVarId) {
        let cx = vars.new_real(-100.0, 100.0, EPS).unwrap();
        let cy = vars.new_real(-100.0, 100.0, EPS).unwrap();
        let r = vars.new_real(r_lo, r_hi, EPS).unwrap();
        (cx, cy, r)
    }

    fn filter(points: Vec<Point>, ids: (RealVarId, RealVarId, RealVarId)) -> CompactnessFilter {
        CompactnessFilter::builder()
            .center_x(ids.0)
            .center_y(ids.1)
            .radius(ids.2)
            .points(points)
            .seed(42)
            .build()
            .unwrap()
    }

    #[test]
    fn builder_validates() {
        assert!(matches!(
            CompactnessFilter::builder().build(),
            Err(BuildError::MissingParameter { name: "center_x" })
        ));
        assert!(matches!(
            CompactnessFilter::builder()
                .center_x(RealVarId(0))
                .center_y(RealVarId(1))
                .radius(RealVarId(2))
                .build(),
            Err(BuildError::MissingParameter { name: "points" })
        ));
    }

    #[test]
    fn determined_domain_pins_the_circle() {
        // Kernel {(0,0), (2,0)}: circle center (1,0), radius 1.
        let g = complete_graph(3);
        let mut domain = BoundedGraph::new(g, &[0, 1], &[0, 1]).unwrap();
        let mut vars = VarStore::new();
        let ids = circle_vars(&mut vars, 0.0, 10.0);
        let f = filter(
            vec![
                Point::new(0.0, 0.0),
                Point::new(2.0, 0.0),
                Point::new(9.0, 9.0),
            ],
            ids,
        );
        let mut ctx = PropagationContext::new(&mut domain, &mut vars);
        f.propagate(&mut ctx).unwrap();
        let cx = ctx.vars().real(ids.0).unwrap();
        let cy = ctx.vars().real(ids.1).unwrap();
        let r = ctx.vars().real(ids.2).unwrap();
        assert!((cx.lo() - 1.0).abs() < EPS && cx.is_instantiated());
        assert!(cy.lo().abs() < EPS);
        assert!((r.lo() - 1.0).abs() < EPS);
    }

    #[test]
    fn determined_circle_outside_bounds_is_a_contradiction() {
        let g = complete_graph(2);
        let mut domain = BoundedGraph::new(g, &[0, 1], &[0, 1]).unwrap();
        let mut vars = VarStore::new();
        let ids = circle_vars(&mut vars, 0.0, 0.5);
        let f = filter(vec![Point::new(0.0, 0.0), Point::new(2.0, 0.0)], ids);
        let mut ctx = PropagationContext::new(&mut domain, &mut vars);
        assert!(matches!(
            f.propagate(&mut ctx),
            Err(FilterError::Contradiction(Contradiction::RealBound { .. }))
        ));
    }

    #[test]
    fn empty_envelope_needs_zero_radius_lower_bound() {
        let g = complete_graph(2);
        let empty = BoundedGraph::new(g, &[], &[]).unwrap();

        let mut vars = VarStore::new();
        let ids = circle_vars(&mut vars, 0.0, 10.0);
        let f = filter(vec![Point::new(0.0, 0.0), Point::new(2.0, 0.0)], ids);
        let mut domain = empty.clone();
        let mut ctx = PropagationContext::new(&mut domain, &mut vars);
        f.propagate(&mut ctx).unwrap();
        assert_eq!(f.entailment(&ctx), Entailment::Satisfied);

        let mut vars = VarStore::new();
        let ids = circle_vars(&mut vars, 1.0, 10.0);
        let f = filter(vec![Point::new(0.0, 0.0), Point::new(2.0, 0.0)], ids);
        let mut domain = empty;
        let mut ctx = PropagationContext::new(&mut domain, &mut vars);
        assert!(matches!(
            f.propagate(&mut ctx),
            Err(FilterError::Contradiction(
                Contradiction::EmptyEnvelopeWithRadius { .. }
            ))
        ));
    }

    #[test]
    fn kernel_circle_beyond_radius_bound_fails() {
        let g = complete_graph(3);
        let mut domain = BoundedGraph::new(g, &[0, 1], &[0, 1, 2]).unwrap();
        let mut vars = VarStore::new();
        let ids = circle_vars(&mut vars, 0.0, 0.5);
        let f = filter(
            vec![
                Point::new(0.0, 0.0),
                Point::new(2.0, 0.0),
                Point::new(1.0, 1.0),
            ],
            ids,
        );
        let mut ctx = PropagationContext::new(&mut domain, &mut vars);
        assert!(matches!(
            f.propagate(&mut ctx),
            Err(FilterError::Contradiction(_))
        ));
    }

    #[test]
    fn far_point_is_pruned_by_the_distance_short_circuit() {
        // Kernel circle: center (1,0), radius 1; radius bound 1.5. A
        // point at distance 40 clears both distance tests and goes.
        let g = complete_graph(3);
        let mut domain = BoundedGraph::new(g, &[0, 1], &[0, 1, 2]).unwrap();
        let mut vars = VarStore::new();
        let ids = circle_vars(&mut vars, 0.0, 1.5);
        let f = filter(
            vec![
                Point::new(0.0, 0.0),
                Point::new(2.0, 0.0),
                Point::new(41.0, 0.0),
            ],
            ids,
        );
        let mut ctx = PropagationContext::new(&mut domain, &mut vars);
        f.propagate(&mut ctx).unwrap();
        assert!(!ctx.graph().in_envelope(2));
    }

    #[test]
    fn tentative_extension_prunes_a_radius_violation() {
        // Adding (1,2) to kernel {(0,0),(2,0)} would need radius 1.25,
        // beyond the 1.1 bound, yet its distance to (1,0) is 2 which is
        // below kernel_radius + 2*r_hi: only the extension test can
        // prune it.
        let g = complete_graph(3);
        let mut domain = BoundedGraph::new(g, &[0, 1], &[0, 1, 2]).unwrap();
        let mut vars = VarStore::new();
        let ids = circle_vars(&mut vars, 0.0, 1.1);
        let f = filter(
            vec![
                Point::new(0.0, 0.0),
                Point::new(2.0, 0.0),
                Point::new(1.0, 2.0),
            ],
            ids,
        );
        let mut ctx = PropagationContext::new(&mut domain, &mut vars);
        f.propagate(&mut ctx).unwrap();
        assert!(!ctx.graph().in_envelope(2));
    }

    #[test]
    fn enclosed_point_survives() {
        let g = complete_graph(3);
        let mut domain = BoundedGraph::new(g, &[0, 1], &[0, 1, 2]).unwrap();
        let mut vars = VarStore::new();
        let ids = circle_vars(&mut vars, 0.0, 1.5);
        let f = filter(
            vec![
                Point::new(0.0, 0.0),
                Point::new(2.0, 0.0),
                Point::new(1.0, 0.5),
            ],
            ids,
        );
        let mut ctx = PropagationContext::new(&mut domain, &mut vars);
        f.propagate(&mut ctx).unwrap();
        assert!(ctx.graph().in_envelope(2));
    }

    #[test]
    fn singleton_kernel_skips_the_extension_test() {
        // One kernel point: only the distance short-circuit applies.
        let g = complete_graph(2);
        let mut domain = BoundedGraph::new(g, &[0], &[0, 1]).unwrap();
        let mut vars = VarStore::new();
        let ids = circle_vars(&mut vars, 0.0, 1.0);
        let f = filter(vec![Point::new(0.0, 0.0), Point::new(2.5, 0.0)], ids);
        let mut ctx = PropagationContext::new(&mut domain, &mut vars);
        f.propagate(&mut ctx).unwrap();
        // Distance 2.5 exceeds both r_hi and kernel_radius + 2*r_hi = 2.
        assert!(!ctx.graph().in_envelope(1));
    }

    #[test]
    fn entailment_states() {
        let g = complete_graph(3);
        let mut vars = VarStore::new();
        let ids = circle_vars(&mut vars, 0.0, 10.0);
        let pts = vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(1.0, 1.0),
        ];
        let f = filter(pts.clone(), ids);

        let mut open = BoundedGraph::new(g.clone(), &[0], &[0, 1, 2]).unwrap();
        let ctx = PropagationContext::new(&mut open, &mut vars);
        assert_eq!(f.entailment(&ctx), Entailment::Undetermined);

        let mut done = BoundedGraph::new(g.clone(), &[0, 1], &[0, 1]).unwrap();
        let ctx = PropagationContext::new(&mut done, &mut vars);
        assert_eq!(f.entailment(&ctx), Entailment::Satisfied);

        let mut tight = VarStore::new();
        let tight_ids = circle_vars(&mut tight, 0.0, 0.5);
        let f2 = filter(pts, tight_ids);
        let mut done = BoundedGraph::new(g, &[0, 1], &[0, 1]).unwrap();
        let ctx = PropagationContext::new(&mut done, &mut tight);
        assert_eq!(f2.entailment(&ctx), Entailment::Violated);
    }
}
