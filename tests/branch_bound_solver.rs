//! Integration tests for the branch and bound solver over hand-built candidate lists.
//!
//! The central scenario is the greedy trap: taking the best candidate at each
//! position in turn can strand a later position without its shared item.
//!
//! Position 0 can take item 0 (weight 1) or item 1 (weight 2); position 1 can
//! only take item 0 (weight 3) before its purchase fallback. Greedy assigns
//! item 0 to position 0 for weight 1 and leaves position 1 a forced purchase,
//! totalling 1001. The optimal assignment gives item 1 to position 0 and item 0
//! to position 1, totalling 5. The solver must backtrack to find it.

use std::collections::HashSet;

use shimfit::solvers::{
    Candidate, CandidateList, Choice, ItemId, Solver, Weight, branch_bound::BranchBoundSolver,
};
use smallvec::smallvec;
use testresult::TestResult;

const PURCHASE: Weight = 1000;

fn item(id: usize, weight: Weight) -> Candidate {
    Candidate::item(ItemId::new(id), weight)
}

fn chosen_weight(list: &CandidateList, choice: Choice) -> Option<Weight> {
    list.iter()
        .find(|candidate| candidate.choice() == choice)
        .map(Candidate::weight)
}

#[test]
fn backtracks_out_of_the_greedy_trap() -> TestResult {
    let positions: Vec<CandidateList> = vec![
        smallvec![item(0, 1), item(1, 2), Candidate::purchase(PURCHASE)],
        smallvec![item(0, 3), Candidate::purchase(PURCHASE)],
    ];

    let solution = BranchBoundSolver::solve(&positions)?;

    assert_eq!(solution.total, 5, "greedy would pay 1001 here");
    assert_eq!(
        solution.choices,
        vec![Choice::Item(ItemId::new(1)), Choice::Item(ItemId::new(0))]
    );

    Ok(())
}

#[test]
fn greedy_trap_with_equal_list_lengths_still_backtracks() -> TestResult {
    // Same trap, but the lists are the same length so the shortest-first
    // visiting order cannot accidentally rescue a greedy descent. The
    // first complete assignment pays 851 for position 1's alternative;
    // the optimum swaps item 0 over to position 1 for a total of 4.
    let positions: Vec<CandidateList> = vec![
        smallvec![item(0, 1), item(1, 2), Candidate::purchase(PURCHASE)],
        smallvec![item(0, 2), item(2, 850), Candidate::purchase(PURCHASE)],
    ];

    let solution = BranchBoundSolver::solve(&positions)?;

    assert_eq!(solution.total, 4);
    assert_eq!(
        solution.choices,
        vec![Choice::Item(ItemId::new(1)), Choice::Item(ItemId::new(0))]
    );

    Ok(())
}

#[test]
fn one_item_across_three_positions_lands_where_it_is_cheapest() -> TestResult {
    let positions: Vec<CandidateList> = vec![
        smallvec![item(0, 10), Candidate::purchase(PURCHASE)],
        smallvec![item(0, 20), Candidate::purchase(PURCHASE)],
        smallvec![item(0, 30), Candidate::purchase(PURCHASE)],
    ];

    let solution = BranchBoundSolver::solve(&positions)?;

    assert_eq!(solution.total, 10 + PURCHASE + PURCHASE);
    assert_eq!(
        solution.choices,
        vec![
            Choice::Item(ItemId::new(0)),
            Choice::Purchase,
            Choice::Purchase
        ]
    );

    Ok(())
}

#[test]
fn purchase_fallback_repeats_freely() -> TestResult {
    let positions: Vec<CandidateList> = vec![
        smallvec![Candidate::purchase(PURCHASE)],
        smallvec![Candidate::purchase(PURCHASE)],
        smallvec![Candidate::purchase(PURCHASE)],
        smallvec![Candidate::purchase(PURCHASE)],
    ];

    let solution = BranchBoundSolver::solve(&positions)?;

    assert_eq!(solution.total, 4 * PURCHASE);
    assert!(
        solution
            .choices
            .iter()
            .all(|choice| *choice == Choice::Purchase)
    );

    Ok(())
}

#[test]
fn shift_chain_relocates_every_item() -> TestResult {
    // Position i can keep item i for 2 or take item i + 1 for 1. Shifting
    // every item down by one keeps all six assignments distinct and saves
    // a point at each position.
    let positions: Vec<CandidateList> = (0..6)
        .map(|position| {
            smallvec![
                item(position + 1, 1),
                item(position, 2),
                Candidate::purchase(PURCHASE),
            ]
        })
        .collect();

    let solution = BranchBoundSolver::solve(&positions)?;

    assert_eq!(solution.total, 6);

    let mut seen = HashSet::new();

    for (position, choice) in solution.choices.iter().enumerate() {
        assert_eq!(*choice, Choice::Item(ItemId::new(position + 1)));
        assert!(seen.insert(*choice), "item consumed twice");
    }

    Ok(())
}

#[test]
fn total_is_the_sum_of_the_chosen_weights() -> TestResult {
    let positions: Vec<CandidateList> = vec![
        smallvec![item(0, 4), item(1, 9), Candidate::purchase(PURCHASE)],
        smallvec![item(2, 6), item(0, 7), Candidate::purchase(PURCHASE)],
        smallvec![item(1, 3), item(2, 5), Candidate::purchase(PURCHASE)],
    ];

    let solution = BranchBoundSolver::solve(&positions)?;

    let recomputed: Weight = solution
        .choices
        .iter()
        .zip(&positions)
        .map(|(choice, list)| chosen_weight(list, *choice).unwrap_or(Weight::MAX))
        .sum();

    assert_eq!(solution.total, recomputed);

    Ok(())
}

#[test]
fn choices_come_from_their_own_position_lists() -> TestResult {
    // Wildly uneven list lengths force the solver to reorder positions
    // internally; every choice must still come from the list the caller
    // supplied at that index.
    let positions: Vec<CandidateList> = vec![
        smallvec![
            item(0, 5),
            item(1, 6),
            item(2, 7),
            item(3, 8),
            Candidate::purchase(PURCHASE),
        ],
        smallvec![Candidate::purchase(PURCHASE)],
        smallvec![item(4, 2), item(5, 3), Candidate::purchase(PURCHASE)],
    ];

    let solution = BranchBoundSolver::solve(&positions)?;

    for (position, choice) in solution.choices.iter().enumerate() {
        let list = &positions[position];

        assert!(
            list.iter().any(|candidate| candidate.choice() == *choice),
            "position {position} resolved to a candidate it never had"
        );
    }

    assert_eq!(solution.total, 5 + PURCHASE + 2);

    Ok(())
}

#[test]
fn empty_input_solves_to_the_empty_plan() -> TestResult {
    let solution = BranchBoundSolver::solve(&[])?;

    assert_eq!(solution.total, 0);
    assert!(solution.choices.is_empty());

    Ok(())
}
