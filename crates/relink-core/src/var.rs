//! Narrowing interval variables and their store.
//!
//! A bound variable only ever narrows: the lower limit may increase, the
//! upper limit may decrease. An update that would cross the opposite limit
//! raises a [`Contradiction`]. Filters hold typed ids into a [`VarStore`]
//! owned by the host, so a filter itself stays stateless across calls.

use crate::error::{BuildError, Contradiction};
use std::fmt;

/// Identifies an integer bound variable within a [`VarStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntVarId(pub u32);

impl fmt::Display for IntVarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for IntVarId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a real bound variable within a [`VarStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RealVarId(pub u32);

impl fmt::Display for RealVarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for RealVarId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// An integer variable with a `[lo, hi]` interval that can only narrow.
///
/// Holds a landscape index scaled by a fixed-point precision factor; see
/// [`crate::fixed::scaled`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntVar {
    lo: i64,
    hi: i64,
}

impl IntVar {
    /// Create a variable with interval `[lo, hi]`.
    pub fn new(lo: i64, hi: i64) -> Result<Self, BuildError> {
        if lo > hi {
            return Err(BuildError::EmptyInterval {
                lo: lo.to_string(),
                hi: hi.to_string(),
            });
        }
        Ok(Self { lo, hi })
    }

    /// Current lower limit.
    pub fn lo(&self) -> i64 {
        self.lo
    }

    /// Current upper limit.
    pub fn hi(&self) -> i64 {
        self.hi
    }

    /// `true` once the interval is a single value.
    pub fn is_instantiated(&self) -> bool {
        self.lo == self.hi
    }

    /// Raise the lower limit to `v`.
    ///
    /// Returns `Ok(true)` if the interval narrowed, `Ok(false)` if `v` was
    /// already entailed, and a [`Contradiction`] if `v` exceeds the upper
    /// limit.
    pub fn update_lower_bound(&mut self, v: i64) -> Result<bool, Contradiction> {
        if v > self.hi {
            return Err(Contradiction::IntBound {
                attempted: v,
                lo: self.lo,
                hi: self.hi,
            });
        }
        if v > self.lo {
            self.lo = v;
            return Ok(true);
        }
        Ok(false)
    }

    /// Lower the upper limit to `v`.
    pub fn update_upper_bound(&mut self, v: i64) -> Result<bool, Contradiction> {
        if v < self.lo {
            return Err(Contradiction::IntBound {
                attempted: v,
                lo: self.lo,
                hi: self.hi,
            });
        }
        if v < self.hi {
            self.hi = v;
            return Ok(true);
        }
        Ok(false)
    }

    /// Pin the variable to exactly `v`.
    pub fn instantiate_to(&mut self, v: i64) -> Result<bool, Contradiction> {
        let narrowed_lo = self.update_lower_bound(v)?;
        let narrowed_hi = self.update_upper_bound(v)?;
        Ok(narrowed_lo || narrowed_hi)
    }
}

/// A real variable with a `[lo, hi]` interval, narrowed up to a tolerance.
///
/// Comparisons use the variable's `eps`: an update only fails once it
/// crosses the opposite limit by more than `eps`, and [`RealVar::contains`]
/// accepts values within `eps` of the interval.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RealVar {
    lo: f64,
    hi: f64,
    eps: f64,
}

impl RealVar {
    /// Create a variable with interval `[lo, hi]` and tolerance `eps`.
    pub fn new(lo: f64, hi: f64, eps: f64) -> Result<Self, BuildError> {
        if !(eps > 0.0) {
            return Err(BuildError::NonPositive {
                name: "eps",
                value: eps,
            });
        }
        if lo > hi {
            return Err(BuildError::EmptyInterval {
                lo: lo.to_string(),
                hi: hi.to_string(),
            });
        }
        Ok(Self { lo, hi, eps })
    }

    /// Current lower limit.
    pub fn lo(&self) -> f64 {
        self.lo
    }

    /// Current upper limit.
    pub fn hi(&self) -> f64 {
        self.hi
    }

    /// The variable's tolerance.
    pub fn eps(&self) -> f64 {
        self.eps
    }

    /// `true` if `v` lies within the interval, up to tolerance.
    pub fn contains(&self, v: f64) -> bool {
        v >= self.lo - self.eps && v <= self.hi + self.eps
    }

    /// `true` once the interval has collapsed to the tolerance width.
    pub fn is_instantiated(&self) -> bool {
        self.hi - self.lo <= self.eps
    }

    /// Raise the lower limit to `v`.
    pub fn update_lower_bound(&mut self, v: f64) -> Result<bool, Contradiction> {
        if v > self.hi + self.eps {
            return Err(Contradiction::RealBound {
                attempted: v,
                lo: self.lo,
                hi: self.hi,
            });
        }
        if v > self.lo {
            self.lo = v.min(self.hi);
            return Ok(true);
        }
        Ok(false)
    }

    /// Lower the upper limit to `v`.
    pub fn update_upper_bound(&mut self, v: f64) -> Result<bool, Contradiction> {
        if v < self.lo - self.eps {
            return Err(Contradiction::RealBound {
                attempted: v,
                lo: self.lo,
                hi: self.hi,
            });
        }
        if v < self.hi {
            self.hi = v.max(self.lo);
            return Ok(true);
        }
        Ok(false)
    }

    /// Pin the variable to exactly `v`, within tolerance.
    pub fn instantiate_to(&mut self, v: f64) -> Result<bool, Contradiction> {
        if !self.contains(v) {
            return Err(Contradiction::RealBound {
                attempted: v,
                lo: self.lo,
                hi: self.hi,
            });
        }
        let changed = self.lo != v || self.hi != v;
        self.lo = v;
        self.hi = v;
        Ok(changed)
    }
}

/// Holds the bound variables of one search branch.
///
/// Filters are registered with [`IntVarId`] / [`RealVarId`] handles and
/// resolve them against the store at each propagation call; the store is
/// owned and trailed by the host.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VarStore {
    ints: Vec<IntVar>,
    reals: Vec<RealVar>,
}

impl VarStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an integer variable with interval `[lo, hi]`.
    pub fn new_int(&mut self, lo: i64, hi: i64) -> Result<IntVarId, BuildError> {
        let id = IntVarId(self.ints.len() as u32);
        self.ints.push(IntVar::new(lo, hi)?);
        Ok(id)
    }

    /// Register a real variable with interval `[lo, hi]` and tolerance `eps`.
    pub fn new_real(&mut self, lo: f64, hi: f64, eps: f64) -> Result<RealVarId, BuildError> {
        let id = RealVarId(self.reals.len() as u32);
        self.reals.push(RealVar::new(lo, hi, eps)?);
        Ok(id)
    }

    /// Read access to an integer variable.
    pub fn int(&self, id: IntVarId) -> Option<&IntVar> {
        self.ints.get(id.0 as usize)
    }

    /// Write access to an integer variable.
    pub fn int_mut(&mut self, id: IntVarId) -> Option<&mut IntVar> {
        self.ints.get_mut(id.0 as usize)
    }

    /// Read access to a real variable.
    pub fn real(&self, id: RealVarId) -> Option<&RealVar> {
        self.reals.get(id.0 as usize)
    }

    /// Write access to a real variable.
    pub fn real_mut(&mut self, id: RealVarId) -> Option<&mut RealVar> {
        self.reals.get_mut(id.0 as usize)
    }
}
