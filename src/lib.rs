//! Shimfit
//!
//! Shimfit is a valve shim assignment optimiser: it plans the cheapest way to bring every
//! valve of a measured engine back into its lash window using the shims already on hand.

pub mod candidates;
pub mod engine;
pub mod fixtures;
pub mod inventory;
pub mod plan;
pub mod prelude;
pub mod shims;
pub mod solvers;
pub mod units;
pub mod valves;
