//! Minimal enclosing circle geometry.
//!
//! [`EnclosingCircle`] maintains the smallest circle containing a point
//! set under incremental insertion, using the move-to-front variant of
//! Welzl's algorithm: points are shuffled once (expected-linear runtime
//! on any input), the circle starts from the first two points, and each
//! point found outside the current circle triggers a bounded nested
//! repair pass that rebuilds the circle with that point on its boundary.
//! No recursion is involved; at most two boundary points besides the
//! newest one determine the final circle.
//!
//! The shuffle seed is injectable for reproducible tests; the default
//! constructor seeds from the clock.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::time::{SystemTime, UNIX_EPOCH};

/// Containment tolerance for boundary points.
const EPS: f64 = 1e-9;

/// A 2D point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    /// Cartesian x.
    pub x: f64,
    /// Cartesian y.
    pub y: f64,
}

impl Point {
    /// Construct a point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A circle given by center and radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    /// Center point.
    pub center: Point,
    /// Radius, non-negative.
    pub radius: f64,
}

impl Circle {
    /// `true` if `p` lies inside the circle, up to tolerance.
    pub fn contains(&self, p: Point) -> bool {
        self.center.distance(p) <= self.radius + EPS
    }

    /// The circle with segment `ab` as diameter.
    fn through_two(a: Point, b: Point) -> Self {
        let center = Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
        Self {
            center,
            radius: center.distance(a).max(center.distance(b)),
        }
    }

    /// The circle through three points.
    ///
    /// Collinear triples have no circumcircle; the widest two-point
    /// circle among the pairs encloses all three and is returned instead.
    fn circumscribed(a: Point, b: Point, c: Point) -> Self {
        let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
        if d.abs() < EPS {
            let ab = Self::through_two(a, b);
            let ac = Self::through_two(a, c);
            let bc = Self::through_two(b, c);
            let mut widest = ab;
            if ac.radius > widest.radius {
                widest = ac;
            }
            if bc.radius > widest.radius {
                widest = bc;
            }
            return widest;
        }
        let a2 = a.x * a.x + a.y * a.y;
        let b2 = b.x * b.x + b.y * b.y;
        let c2 = c.x * c.x + c.y * c.y;
        let ux = (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d;
        let uy = (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d;
        let center = Point::new(ux, uy);
        Self {
            center,
            radius: center.distance(a),
        }
    }
}

/// Smallest enclosing circle with incremental insertion.
#[derive(Clone, Debug)]
pub struct EnclosingCircle {
    points: Vec<Point>,
    circle: Option<Circle>,
}

impl EnclosingCircle {
    /// Build the circle of `points`, shuffling with a clock-derived seed.
    pub fn new(points: &[Point]) -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x5EED);
        Self::with_seed(points, seed)
    }

    /// Build the circle of `points`, shuffling with the given seed.
    ///
    /// Identical seeds and inputs produce identical shuffled orders, so
    /// tests are reproducible.
    pub fn with_seed(points: &[Point], seed: u64) -> Self {
        let mut shuffled = points.to_vec();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        shuffled.shuffle(&mut rng);
        let mut ec = Self {
            points: shuffled,
            circle: None,
        };
        ec.recompute();
        ec
    }

    /// Number of points currently enclosed.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// `true` if no point has been inserted.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The current circle; `None` while the point set is empty.
    pub fn circle(&self) -> Option<Circle> {
        self.circle
    }

    /// Insert one point, keeping the previously shuffled order for the
    /// existing points.
    pub fn add_point(&mut self, p: Point) {
        match self.circle {
            None => {
                self.circle = Some(Circle {
                    center: p,
                    radius: 0.0,
                });
            }
            Some(_) if self.points.len() == 1 => {
                self.circle = Some(Circle::through_two(self.points[0], p));
            }
            Some(c) => {
                if !c.contains(p) {
                    self.circle = Some(Self::disk_with_one(&self.points, p));
                }
            }
        }
        self.points.push(p);
    }

    /// Radius the circle would take if `p` were inserted, without
    /// mutating anything.
    pub fn extended_radius(&self, p: Point) -> f64 {
        match self.circle {
            None => 0.0,
            Some(_) if self.points.len() == 1 => Circle::through_two(self.points[0], p).radius,
            Some(c) => {
                if c.contains(p) {
                    c.radius
                } else {
                    Self::disk_with_one(&self.points, p).radius
                }
            }
        }
    }

    /// Full pass over the shuffled points.
    fn recompute(&mut self) {
        self.circle = match self.points.len() {
            0 => None,
            1 => Some(Circle {
                center: self.points[0],
                radius: 0.0,
            }),
            _ => {
                let mut c = Circle::through_two(self.points[0], self.points[1]);
                for i in 2..self.points.len() {
                    if !c.contains(self.points[i]) {
                        c = Self::disk_with_one(&self.points[..i], self.points[i]);
                    }
                }
                Some(c)
            }
        };
    }

    /// Smallest circle enclosing `pts` with `p` on its boundary.
    fn disk_with_one(pts: &[Point], p: Point) -> Circle {
        let mut c = Circle::through_two(pts[0], p);
        for j in 1..pts.len() {
            if !c.contains(pts[j]) {
                c = Self::disk_with_two(&pts[..j], pts[j], p);
            }
        }
        c
    }

    /// Smallest circle enclosing `pts` with `p` and `q` on its boundary.
    fn disk_with_two(pts: &[Point], q: Point, p: Point) -> Circle {
        let mut c = Circle::through_two(q, p);
        for &r in pts {
            if !c.contains(r) {
                c = Circle::circumscribed(p, q, r);
            }
        }
        c
    }
}
