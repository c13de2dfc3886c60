//! Exhaustive solver
//!
//! Enumerates every feasible assignment in the original position order,
//! with no reordering and no pruning. Exponential in the number of
//! positions, so it only suits small instances; it exists as a
//! correctness oracle for the pruned solver.

use rustc_hash::FxHashSet;

use crate::solvers::{
    CandidateList, Choice, ItemId, Solution, Solver, SolverError, Weight, validate,
};

/// Brute-force solver for small instances.
#[derive(Debug)]
pub struct ExhaustiveSolver;

impl Solver for ExhaustiveSolver {
    fn solve(positions: &[CandidateList]) -> Result<Solution, SolverError> {
        validate(positions)?;

        let mut search = Enumeration {
            positions,
            consumed: FxHashSet::default(),
            scratch: vec![Choice::Purchase; positions.len()],
            best: None,
        };

        search.visit(0, 0);

        let best = search.best.ok_or(SolverError::InvariantViolation {
            message: "enumeration finished without a complete assignment",
        })?;

        Ok(Solution {
            total: best.total,
            choices: best.choices,
        })
    }
}

struct Enumeration<'a> {
    positions: &'a [CandidateList],
    consumed: FxHashSet<ItemId>,
    scratch: Vec<Choice>,
    best: Option<Best>,
}

struct Best {
    total: Weight,
    choices: Vec<Choice>,
}

impl Enumeration<'_> {
    fn visit(&mut self, pos: usize, cost: Weight) {
        let Some(column) = self.positions.get(pos) else {
            // Strict improvement, so among equal totals the assignment
            // generated first is kept.
            let improves = self.best.as_ref().is_none_or(|best| cost < best.total);

            if improves {
                self.best = Some(Best {
                    total: cost,
                    choices: self.scratch.clone(),
                });
            }

            return;
        };

        for candidate in column {
            if let Choice::Item(item) = candidate.choice() {
                if !self.consumed.insert(item) {
                    continue;
                }
            }

            if let Some(slot) = self.scratch.get_mut(pos) {
                *slot = candidate.choice();
            }

            self.visit(pos + 1, cost + candidate.weight());

            if let Choice::Item(item) = candidate.choice() {
                self.consumed.remove(&item);
            }
        }
    }
}
