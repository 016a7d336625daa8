//! Configuration types for evolutionary runs.

use serde::{Deserialize, Serialize};

/// Top-level configuration for a genetic search run.
///
/// All rates are probabilities in [0, 1]. The configuration is validated once,
/// eagerly, when an engine is constructed; nothing runs on an invalid config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Number of individuals per generation.
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    /// Number of generational cycles to run. Zero is allowed and degenerates
    /// to evaluating and ranking the initial random population.
    #[serde(default = "default_generations")]
    pub generations: usize,
    /// Per-gene flip probability applied to non-elite offspring.
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,
    /// Probability that a parent pair undergoes single-point crossover.
    #[serde(default = "default_crossover_rate")]
    pub crossover_rate: f64,
    /// Fraction of the population carried over unchanged each generation.
    /// `floor(elitism_fraction * population_size)` must be at least 2.
    #[serde(default = "default_elitism_fraction")]
    pub elitism_fraction: f64,
    /// Side length of the square candidate pattern; genomes have
    /// `genome_side * genome_side` genes.
    #[serde(default = "default_genome_side")]
    pub genome_side: usize,
    /// Rows of the ambient toroidal lattice each candidate is embedded into.
    #[serde(default = "default_rows")]
    pub rows: usize,
    /// Columns of the ambient toroidal lattice.
    #[serde(default = "default_cols")]
    pub cols: usize,
    /// Automaton steps simulated per fitness evaluation.
    #[serde(default = "default_steps_per_evaluation")]
    pub steps_per_evaluation: u64,
    /// What to do when a single fitness evaluation fails.
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: default_population_size(),
            generations: default_generations(),
            mutation_rate: default_mutation_rate(),
            crossover_rate: default_crossover_rate(),
            elitism_fraction: default_elitism_fraction(),
            genome_side: default_genome_side(),
            rows: default_rows(),
            cols: default_cols(),
            steps_per_evaluation: default_steps_per_evaluation(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

fn default_population_size() -> usize {
    50
}
fn default_generations() -> usize {
    50
}
fn default_mutation_rate() -> f64 {
    0.2
}
fn default_crossover_rate() -> f64 {
    0.3
}
fn default_elitism_fraction() -> f64 {
    0.2
}
fn default_genome_side() -> usize {
    5
}
fn default_rows() -> usize {
    25
}
fn default_cols() -> usize {
    25
}
fn default_steps_per_evaluation() -> u64 {
    40
}

/// Policy for individual evaluation failures (dead baseline, non-finite
/// custom score).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FailurePolicy {
    /// Abort the current generation and surface the error.
    #[default]
    Abort,
    /// Score the failed individual 0.0 and continue. Selection still requires
    /// at least one positive score in the generation.
    ZeroScore,
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("population size must be positive")]
    InvalidPopulationSize,
    #[error("genome side length must be positive")]
    InvalidGenomeSide,
    #[error("grid dimensions (rows, cols) must be non-zero")]
    InvalidDimensions,
    #[error("genome side {side} exceeds grid dimensions {rows}x{cols}")]
    GenomeLargerThanGrid {
        side: usize,
        rows: usize,
        cols: usize,
    },
    #[error("{name} must be within [0, 1], got {value}")]
    RateOutOfRange { name: &'static str, value: f64 },
    #[error("elitism produces {elite_count} elites; at least 2 are required")]
    ElitismTooSmall { elite_count: usize },
}

impl EvolutionConfig {
    /// Number of top-ranked individuals copied unchanged into each new
    /// generation.
    pub fn elite_count(&self) -> usize {
        (self.elitism_fraction * self.population_size as f64).floor() as usize
    }

    /// Total gene count per genome.
    pub fn genome_len(&self) -> usize {
        self.genome_side * self.genome_side
    }

    /// Validate all parameters. Called once at engine construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::InvalidPopulationSize);
        }
        if self.genome_side == 0 {
            return Err(ConfigError::InvalidGenomeSide);
        }
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.genome_side > self.rows.min(self.cols) {
            return Err(ConfigError::GenomeLargerThanGrid {
                side: self.genome_side,
                rows: self.rows,
                cols: self.cols,
            });
        }

        let check_rate = |name: &'static str, value: f64| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(ConfigError::RateOutOfRange { name, value })
            }
        };
        check_rate("mutation_rate", self.mutation_rate)?;
        check_rate("crossover_rate", self.crossover_rate)?;
        check_rate("elitism_fraction", self.elitism_fraction)?;

        let elite_count = self.elite_count();
        if elite_count < 2 {
            return Err(ConfigError::ElitismTooSmall { elite_count });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = EvolutionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.elite_count(), 10);
        assert_eq!(config.genome_len(), 25);
    }

    #[test]
    fn test_rate_out_of_range() {
        let config = EvolutionConfig {
            mutation_rate: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RateOutOfRange {
                name: "mutation_rate",
                ..
            })
        ));
    }

    #[test]
    fn test_elitism_too_small() {
        let config = EvolutionConfig {
            population_size: 10,
            elitism_fraction: 0.1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ElitismTooSmall { elite_count: 1 })
        ));
    }

    #[test]
    fn test_genome_must_fit_grid() {
        let config = EvolutionConfig {
            genome_side: 30,
            rows: 25,
            cols: 40,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GenomeLargerThanGrid { side: 30, .. })
        ));
    }

    #[test]
    fn test_zero_population_rejected() {
        let config = EvolutionConfig {
            population_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPopulationSize)
        ));
    }

    #[test]
    fn test_zero_generations_allowed() {
        let config = EvolutionConfig {
            generations: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let config = EvolutionConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: EvolutionConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.population_size, config.population_size);
        assert_eq!(parsed.steps_per_evaluation, config.steps_per_evaluation);
    }
}
