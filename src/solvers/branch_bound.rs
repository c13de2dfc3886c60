//! Branch-and-bound solver
//!
//! Depth-first search over the cross-product of the candidate lists,
//! pruned with two monotone bounds: the accumulated weight directly, and
//! the accumulated weight plus a precomputed lower bound on everything
//! still unassigned. Positions are visited most-constrained first.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::solvers::{
    Candidate, CandidateList, Choice, ItemId, Solution, Solver, SolverError, Weight, validate,
};

/// Exact solver that prunes the search with incumbent bounds.
#[derive(Debug)]
pub struct BranchBoundSolver;

impl Solver for BranchBoundSolver {
    fn solve(positions: &[CandidateList]) -> Result<Solution, SolverError> {
        solve_with_pruning(positions, Pruning::FULL)
    }
}

/// Which of the two pruning cuts the search applies. Disabling either one
/// changes only the runtime, never the reported optimum.
#[derive(Clone, Copy)]
struct Pruning {
    direct_bound: bool,
    lookahead_bound: bool,
}

impl Pruning {
    const FULL: Pruning = Pruning {
        direct_bound: true,
        lookahead_bound: true,
    };
}

fn solve_with_pruning(
    positions: &[CandidateList],
    pruning: Pruning,
) -> Result<Solution, SolverError> {
    validate(positions)?;

    if positions.is_empty() {
        return Ok(Solution {
            total: 0,
            choices: Vec::new(),
        });
    }

    let order = position_order(positions);

    let mut columns = Vec::with_capacity(order.len());

    for &original in &order {
        let column = positions
            .get(original)
            .ok_or(SolverError::InvariantViolation {
                message: "position order references a missing candidate list",
            })?;

        columns.push(column);
    }

    let remaining = suffix_minima(&columns);

    let mut context = SearchContext {
        scratch: vec![Choice::Purchase; columns.len()],
        columns,
        remaining,
        consumed: FxHashSet::default(),
        incumbent: None,
        pruning,
    };

    context.descend(0, 0);

    // Every list holds the purchase fallback, so the all-purchase leaf is
    // always reachable and an incumbent must exist.
    let incumbent = context.incumbent.ok_or(SolverError::InvariantViolation {
        message: "search finished without recording a complete assignment",
    })?;

    let mut choices = vec![Choice::Purchase; positions.len()];

    for (&original, &choice) in order.iter().zip(incumbent.choices.iter()) {
        if let Some(slot) = choices.get_mut(original) {
            *slot = choice;
        }
    }

    Ok(Solution {
        total: incumbent.total,
        choices,
    })
}

/// Visit positions shortest candidate list first. The sort is stable, so
/// equal lengths keep their original order and the search stays
/// deterministic.
fn position_order(positions: &[CandidateList]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..positions.len()).collect();

    order.sort_by_key(|&position| positions.get(position).map_or(0, SmallVec::len));

    order
}

/// Lower-bound table over position suffixes: entry `k` is the sum of the
/// minimum weights of columns `k..`, entry `len` is zero. Lists are sorted
/// ascending, so each column's minimum is its first entry.
fn suffix_minima(columns: &[&CandidateList]) -> Vec<Weight> {
    let mut table = Vec::with_capacity(columns.len() + 1);
    let mut below: Weight = 0;

    table.push(below);

    for column in columns.iter().rev() {
        below += column.first().map_or(0, Candidate::weight);
        table.push(below);
    }

    table.reverse();

    table
}

/// All mutable search state, local to one solve call.
struct SearchContext<'a> {
    /// Candidate lists in visiting order.
    columns: Vec<&'a CandidateList>,

    /// Suffix lower bounds over `columns`.
    remaining: Vec<Weight>,

    /// Items consumed by the ancestors of the current frame.
    consumed: FxHashSet<ItemId>,

    /// The partial assignment, indexed by visiting position. Overwritten
    /// in place on descent; only leaves snapshot it.
    scratch: Vec<Choice>,

    incumbent: Option<Incumbent>,
    pruning: Pruning,
}

struct Incumbent {
    total: Weight,
    choices: Vec<Choice>,
}

impl SearchContext<'_> {
    /// Walks one position, trying its candidates in ascending weight
    /// order. Pruning happens through the bounds alone; a subtree that
    /// improves the incumbent tightens them for every sibling still to
    /// come, at this frame and above.
    fn descend(&mut self, pos: usize, cost: Weight) {
        let Some(&column) = self.columns.get(pos) else {
            self.record(cost);
            return;
        };

        let lookahead = self.remaining.get(pos + 1).copied().unwrap_or(0);

        for candidate in column {
            if let Some(best) = self.best_total() {
                // Candidates are sorted ascending, so once one fails a
                // bound every later one fails it too.
                if self.pruning.direct_bound && cost + candidate.weight() >= best {
                    break;
                }

                if self.pruning.lookahead_bound && cost + candidate.weight() + lookahead >= best {
                    break;
                }
            }

            if let Choice::Item(item) = candidate.choice() {
                // Consumed by an ancestor. Later candidates may still be
                // free, so skip just this one.
                if !self.consumed.insert(item) {
                    continue;
                }
            }

            if let Some(slot) = self.scratch.get_mut(pos) {
                *slot = candidate.choice();
            }

            self.descend(pos + 1, cost + candidate.weight());

            if let Choice::Item(item) = candidate.choice() {
                self.consumed.remove(&item);
            }
        }
    }

    /// Evaluates a complete assignment. Strict improvement only, so on
    /// weight ties the first assignment found is kept.
    fn record(&mut self, total: Weight) {
        let improved = self
            .incumbent
            .as_ref()
            .is_none_or(|incumbent| total < incumbent.total);

        if improved {
            self.incumbent = Some(Incumbent {
                total,
                choices: self.scratch.clone(),
            });
        }
    }

    fn best_total(&self) -> Option<Weight> {
        self.incumbent.as_ref().map(|incumbent| incumbent.total)
    }
}
