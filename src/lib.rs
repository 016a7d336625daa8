//! Genetic search for Game of Life seed patterns on a toroidal lattice.
//!
//! This crate simulates Conway's Game of Life on a torus and runs a genetic
//! algorithm over small square initial configurations, scoring each candidate
//! by a caller-selected fitness function evaluated over its simulated
//! trajectory.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration, genome, and pattern types
//! - `compute`: The lattice engine, simulation drivers, and the evolutionary
//!   search
//!
//! # Example
//!
//! ```rust,no_run
//! use conway_evolve::{EvolutionConfig, FitnessMetric, evolve};
//!
//! let config = EvolutionConfig {
//!     population_size: 30,
//!     generations: 20,
//!     ..Default::default()
//! };
//!
//! let result = evolve(&config, FitnessMetric::SurvivalRatio, 42).unwrap();
//! println!(
//!     "best fitness {:.3} after {} generations",
//!     result.best.fitness, result.stats.generations
//! );
//! println!("{}", result.best.genome);
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::evolution::{EvolutionEngine, EvolutionResult, FitnessMetric, evolve};
pub use compute::{Equilibrium, Grid, run_steps, run_until_stable};
pub use schema::{EvolutionConfig, Genome, Pattern};
