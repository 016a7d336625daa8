//! Evolutionary search over seed patterns.
//!
//! The search system consists of:
//!
//! - **Genome Operations** (`genome`): the seeded random source, random
//!   generation, single-point crossover, and bit-flip mutation
//! - **Fitness** (`fitness`): pluggable objectives scored over a simulated
//!   trajectory
//! - **Search** (`search`): the generational engine with fitness-proportional
//!   selection and elitism
//!
//! # Example
//!
//! ```rust,no_run
//! use conway_evolve::compute::evolution::{FitnessMetric, evolve};
//! use conway_evolve::schema::EvolutionConfig;
//!
//! let config = EvolutionConfig::default();
//! let result = evolve(&config, FitnessMetric::SurvivalRatio, 42).unwrap();
//! println!("best fitness: {:.3}", result.best.fitness);
//! println!("{}", result.best.genome);
//! ```

mod fitness;
mod genome;
mod search;

pub use fitness::{
    CustomFitnessFn, EvaluationError, EvaluationRecord, FitnessEvaluator, FitnessMetric,
};
pub use genome::{GenomeRng, genome_distance};
pub use search::{
    EvolutionEngine, EvolutionError, EvolutionResult, GenerationSummary, Individual,
    InvalidFitnessError, Population, RunStats, evolve,
};
