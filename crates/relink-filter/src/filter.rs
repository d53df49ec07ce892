//! The [`Filter`] trait, its error type, and entailment states.

use crate::context::PropagationContext;
use relink_core::Contradiction;
use std::error::Error;
use std::fmt;

/// Outcome of an entailment query.
///
/// Queried by the host independently of propagation, for instance to
/// decide whether a constraint has become redundant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entailment {
    /// Every completion of the current domains satisfies the constraint.
    Satisfied,
    /// No completion of the current domains satisfies the constraint.
    Violated,
    /// Both outcomes are still possible.
    Undetermined,
}

/// Errors from a single filter invocation.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterError {
    /// The current domains admit no solution; the host must backtrack.
    Contradiction(Contradiction),
    /// The filter referenced a variable id absent from the store.
    ///
    /// A wiring error: the filter was registered against the wrong store.
    /// Unlike a contradiction, backtracking cannot repair it.
    UnknownVariable {
        /// Name of the failing filter.
        filter: String,
    },
    /// A filter's static tables do not match the domain's node count.
    ShapeMismatch {
        /// Name of the failing filter.
        filter: String,
        /// Node count the filter was built for.
        expected: usize,
        /// Node count of the domain it was invoked on.
        actual: usize,
    },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contradiction(c) => write!(f, "contradiction: {c}"),
            Self::UnknownVariable { filter } => {
                write!(f, "filter '{filter}' references an unknown variable")
            }
            Self::ShapeMismatch {
                filter,
                expected,
                actual,
            } => write!(
                f,
                "filter '{filter}' was built for {expected} nodes, domain has {actual}"
            ),
        }
    }
}

impl Error for FilterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Contradiction(c) => Some(c),
            _ => None,
        }
    }
}

impl From<Contradiction> for FilterError {
    fn from(c: Contradiction) -> Self {
        Self::Contradiction(c)
    }
}

/// A narrowing operator over a bounded graph domain and bound variables.
///
/// # Contract
///
/// - `propagate()` must be deterministic and must terminate in time
///   bounded by the graph size.
/// - `&self`: filters are stateless across calls; mutable search state
///   lives in the context. The only exception is an internal cache over
///   immutable grid geometry, which must not affect results.
/// - Narrowing only: a filter may enforce or remove envelope nodes and
///   tighten variable bounds, never the reverse.
/// - A wiped-out domain is reported as `Err(FilterError::Contradiction)`;
///   the host treats it as the cue to backtrack.
///
/// # Object safety
///
/// The trait is object-safe; a host holds `Vec<Box<dyn Filter>>` and
/// invokes each on domain-change notification until no filter narrows
/// anything further.
pub trait Filter: Send + 'static {
    /// Human-readable name for error reporting.
    fn name(&self) -> &str;

    /// Tighten the domains or fail.
    fn propagate(&self, ctx: &mut PropagationContext<'_>) -> Result<(), FilterError>;

    /// Report the constraint's status without mutating anything.
    fn entailment(&self, ctx: &PropagationContext<'_>) -> Entailment;
}
