//! Assignment solvers
//!
//! The solvers work on opaque candidate lists: one ordered list per valve
//! position, each entry either a pooled inventory item or the purchase
//! fallback, annotated with an integer weight. They know nothing about
//! shims or inches; the candidate builder lowers the physical problem to
//! this form and the fit plan raises the answer back.

use std::fmt;

use smallvec::SmallVec;
use thiserror::Error;

pub mod branch_bound;
pub mod exhaustive;

/// Integer cost of one candidate; lower is better.
pub type Weight = u64;

/// Dense id of one consumable inventory item.
///
/// Ids index the candidate builder's item table. The same physical item
/// carries the same id in every position it appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(usize);

impl ItemId {
    /// Creates an id from its dense index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the dense index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a position resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Choice {
    /// Consume the pooled item with this id. Each item may be chosen at
    /// most once across the whole assignment.
    Item(ItemId),

    /// Buy a new part instead. Always admissible, at any number of
    /// positions.
    Purchase,
}

/// One candidate option for a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    choice: Choice,
    weight: Weight,
}

impl Candidate {
    /// Creates a candidate that consumes a pooled item.
    #[must_use]
    pub const fn item(id: ItemId, weight: Weight) -> Self {
        Self {
            choice: Choice::Item(id),
            weight,
        }
    }

    /// Creates the purchase fallback candidate.
    #[must_use]
    pub const fn purchase(weight: Weight) -> Self {
        Self {
            choice: Choice::Purchase,
            weight,
        }
    }

    /// What this candidate resolves the position to.
    #[must_use]
    pub const fn choice(&self) -> Choice {
        self.choice
    }

    /// The candidate's weight.
    #[must_use]
    pub const fn weight(&self) -> Weight {
        self.weight
    }
}

/// The candidates for one position, ascending by weight, ending with the
/// purchase fallback.
pub type CandidateList = SmallVec<[Candidate; 10]>;

/// A complete minimum-weight assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// Sum of the chosen candidates' weights.
    pub total: Weight,

    /// The winning choice per position, in the caller's original position
    /// order.
    pub choices: Vec<Choice>,
}

/// Solver Errors
#[derive(Debug, Error)]
pub enum SolverError {
    /// A position has no candidates at all, so not even the purchase
    /// fallback is available.
    #[error("Position {position} has an empty candidate list")]
    EmptyCandidates {
        /// Index of the offending position
        position: usize,
    },

    /// A position's candidate list lacks the purchase fallback, so a
    /// complete assignment cannot be guaranteed.
    #[error("Position {position} has no purchase fallback")]
    NoPurchaseFallback {
        /// Index of the offending position
        position: usize,
    },

    /// A position's candidate list is not sorted ascending by weight. The
    /// pruning cuts rely on that order, so searching it would silently
    /// return a suboptimal answer.
    #[error("Position {position} has candidates out of ascending weight order")]
    UnsortedCandidates {
        /// Index of the offending position
        position: usize,
    },

    /// Internal solver invariant was violated (this is a bug).
    #[error("solver invariant violated: {message}")]
    InvariantViolation {
        /// What invariant was violated
        message: &'static str,
    },
}

/// Trait for solving the shim assignment problem over candidate lists.
pub trait Solver {
    /// Finds a minimum-weight complete assignment: one choice per
    /// position, no pooled item consumed twice.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if the candidate lists violate the input
    /// contract or an internal invariant breaks.
    fn solve(positions: &[CandidateList]) -> Result<Solution, SolverError>;
}

/// Checks the input contract shared by every solver: each list non-empty,
/// sorted ascending by weight and holding a purchase fallback.
pub(crate) fn validate(positions: &[CandidateList]) -> Result<(), SolverError> {
    for (position, candidates) in positions.iter().enumerate() {
        if candidates.is_empty() {
            return Err(SolverError::EmptyCandidates { position });
        }

        let unsorted = candidates
            .iter()
            .zip(candidates.iter().skip(1))
            .any(|(earlier, later)| earlier.weight() > later.weight());

        if unsorted {
            return Err(SolverError::UnsortedCandidates { position });
        }

        let has_fallback = candidates
            .iter()
            .any(|candidate| candidate.choice() == Choice::Purchase);

        if !has_fallback {
            return Err(SolverError::NoPurchaseFallback { position });
        }
    }

    Ok(())
}
