//! Compute module - the automaton engine and the evolutionary search.

mod grid;
pub mod simulator;

pub mod evolution;

pub use grid::*;
pub use simulator::{DEFAULT_MAX_STEPS, Equilibrium, default_window, run_steps, run_until_stable};
