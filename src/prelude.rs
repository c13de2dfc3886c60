//! Shimfit prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    candidates::{CandidateError, CandidateSet, PURCHASE_WEIGHT},
    engine::{Engine, EngineError},
    fixtures::{Fixture, FixtureError},
    inventory::{Inventory, InventoryError, Shim, ShimKey, ShimOrigin},
    plan::{FitPlan, Fitment, PlanError, ShimChange},
    shims::{RoundMode, ShimCatalog, ShimSize},
    solvers::{
        Candidate, CandidateList, Choice, ItemId, Solution, Solver, SolverError, Weight,
        branch_bound::BranchBoundSolver, exhaustive::ExhaustiveSolver,
    },
    units::Inches,
    valves::{LashSpec, LashSpecError, ValveKind, ValveMeasurement},
};
