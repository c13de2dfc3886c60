//! Shimfit CLI
//!
//! Plans a full shim change for a measured engine fixture.
//!
//! Use `-f` to load a fixture set by name
//! Use `-s` to pick the search strategy
//! Use `-o` to write the plan to a file instead of the terminal

use std::{fs::File, io, io::Write, path::PathBuf, time::Instant};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use humanize_duration::{Truncate, prelude::DurationExt};

use shimfit::{
    candidates::CandidateSet,
    fixtures::Fixture,
    plan::FitPlan,
    solvers::{Solver, branch_bound::BranchBoundSolver, exhaustive::ExhaustiveSolver},
};

/// Arguments for the shim fit planner
#[derive(Debug, Parser)]
struct PlannerArgs {
    /// Fixture set to use for the engine, inventory and catalog
    #[clap(short, long, default_value = "duratec")]
    fixture: String,

    /// Search strategy
    #[clap(short, long, value_enum, default_value_t = SolverChoice::BranchBound)]
    solver: SolverChoice,

    /// Output file path
    #[clap(short, long)]
    out: Option<PathBuf>,
}

/// Which search drives the assignment
#[derive(Debug, Clone, Copy, ValueEnum)]
enum SolverChoice {
    /// Depth-first search with pruning
    BranchBound,

    /// Full enumeration, only practical for small engines
    Exhaustive,
}

fn main() -> Result<()> {
    let args = PlannerArgs::parse();

    let fixture = Fixture::from_set(&args.fixture)?;
    let engine = fixture.engine()?;
    let inventory = fixture.inventory()?;
    let catalog = fixture.catalog()?;

    let candidates = CandidateSet::build(engine, &inventory, catalog)?;

    let start = Instant::now();

    let solution = match args.solver {
        SolverChoice::BranchBound => BranchBoundSolver::solve(candidates.positions())?,
        SolverChoice::Exhaustive => ExhaustiveSolver::solve(candidates.positions())?,
    };

    let elapsed = start.elapsed();

    let plan = FitPlan::from_solution(engine, &inventory, &candidates, &solution)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    writeln!(handle, "\n \x1b[1m{}\x1b[0m", engine.name())?;

    if let Some(out) = args.out.as_deref() {
        let mut file = File::create(out)?;

        plan.write_to(&mut file, engine)?;

        writeln!(handle, "\nFit plan written to: {}", out.display())?;
    } else {
        plan.write_to(&mut handle, engine)?;
    }

    writeln!(
        handle,
        " {} ({}s)",
        elapsed.human(Truncate::Nano),
        elapsed.as_secs_f32()
    )?;

    Ok(())
}
