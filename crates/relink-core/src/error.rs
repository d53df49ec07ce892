//! Error types for the relink core.
//!
//! Two disjoint families, mirroring how failures reach the caller:
//! [`BuildError`] for construction-time rejection (fatal, never retried)
//! and [`Contradiction`] for propagation-time wipeout (expected, the host
//! backtracks). Neither is ever printed or logged by this workspace; both
//! are returned as typed values.

use std::error::Error;
use std::fmt;

/// Errors raised while assembling a planning problem.
///
/// These are programming or input errors: once construction succeeds, no
/// filter call can raise them.
#[derive(Clone, Debug, PartialEq)]
pub enum BuildError {
    /// Attempted to construct a grid with zero cells.
    EmptyGrid,
    /// A grid dimension exceeds the addressable node space.
    DimensionTooLarge {
        /// Which dimension was rejected.
        name: &'static str,
        /// The rejected value.
        value: u64,
        /// Largest accepted value.
        max: u64,
    },
    /// A cell or node index is outside its index space.
    IndexOutOfRange {
        /// What the index addresses ("cell", "node", "group", ...).
        name: &'static str,
        /// The rejected index.
        index: usize,
        /// Size of the index space.
        count: usize,
    },
    /// Two arrays that must describe the same cells have different lengths.
    LengthMismatch {
        /// Name of the mismatched array.
        name: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },
    /// A parameter that must be strictly positive was not.
    NonPositive {
        /// Parameter name.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A fixed-point precision outside the supported range.
    PrecisionOutOfRange {
        /// The rejected precision.
        precision: u32,
        /// Largest supported precision.
        max: u32,
    },
    /// An interval variable constructed with `lo > hi`.
    EmptyInterval {
        /// Lower limit as text (covers both integer and real variables).
        lo: String,
        /// Upper limit as text.
        hi: String,
    },
    /// A required builder parameter was never set.
    MissingParameter {
        /// Parameter name.
        name: &'static str,
    },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "grid must have at least one cell"),
            Self::DimensionTooLarge { name, value, max } => {
                write!(f, "{name} = {value} exceeds the maximum of {max}")
            }
            Self::IndexOutOfRange { name, index, count } => {
                write!(f, "{name} index {index} out of range (count = {count})")
            }
            Self::LengthMismatch {
                name,
                expected,
                actual,
            } => {
                write!(f, "{name} has length {actual}, expected {expected}")
            }
            Self::NonPositive { name, value } => {
                write!(f, "{name} must be strictly positive, got {value}")
            }
            Self::PrecisionOutOfRange { precision, max } => {
                write!(f, "precision {precision} out of range (max {max})")
            }
            Self::EmptyInterval { lo, hi } => {
                write!(f, "empty interval: lo = {lo} > hi = {hi}")
            }
            Self::MissingParameter { name } => write!(f, "{name} is required"),
        }
    }
}

impl Error for BuildError {}

/// Signal that the current domains admit no solution.
///
/// Raised by variable narrowing and graph-domain operations, propagated
/// unchanged through filter code with `?`, and consumed by the host as the
/// cue to backtrack.
#[derive(Clone, Debug, PartialEq)]
pub enum Contradiction {
    /// An integer bound update crossed the opposite bound.
    IntBound {
        /// The value the update tried to impose.
        attempted: i64,
        /// Current lower bound.
        lo: i64,
        /// Current upper bound.
        hi: i64,
    },
    /// A real bound update crossed the opposite bound beyond tolerance.
    RealBound {
        /// The value the update tried to impose.
        attempted: f64,
        /// Current lower bound.
        lo: f64,
        /// Current upper bound.
        hi: f64,
    },
    /// `enforce_node` on a node no longer in the envelope.
    EnforceOutsideEnvelope {
        /// The conflicting node.
        node: u32,
    },
    /// `remove_node` on a node already in the kernel.
    RemoveKernelNode {
        /// The conflicting node.
        node: u32,
    },
    /// A mandatory node cannot reach any committed component.
    UnreachableKernelNode {
        /// The stranded node.
        node: u32,
    },
    /// No selectable point remains while the radius lower bound is positive.
    EmptyEnvelopeWithRadius {
        /// The positive radius lower bound.
        radius_lo: f64,
    },
}

impl fmt::Display for Contradiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IntBound { attempted, lo, hi } => {
                write!(f, "integer bound {attempted} crosses interval [{lo}, {hi}]")
            }
            Self::RealBound { attempted, lo, hi } => {
                write!(f, "real bound {attempted} crosses interval [{lo}, {hi}]")
            }
            Self::EnforceOutsideEnvelope { node } => {
                write!(f, "node {node} cannot be enforced: not in the envelope")
            }
            Self::RemoveKernelNode { node } => {
                write!(f, "node {node} cannot be removed: already in the kernel")
            }
            Self::UnreachableKernelNode { node } => {
                write!(f, "kernel node {node} unreachable from any committed component")
            }
            Self::EmptyEnvelopeWithRadius { radius_lo } => {
                write!(
                    f,
                    "no selectable point left but radius lower bound is {radius_lo}"
                )
            }
        }
    }
}

impl Error for Contradiction {}
