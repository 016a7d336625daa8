//! Fitness evaluation for candidate seed patterns.

use std::fmt;
use std::sync::Arc;

use crate::compute::{Grid, GridError, simulator};
use crate::schema::{EvolutionConfig, Genome};

/// Measurements taken around one simulated trajectory.
///
/// Custom fitness functions score a candidate from these before/after
/// metrics alone.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationRecord {
    /// Live cells right after embedding, before any step.
    pub baseline_active: usize,
    /// Live cells after the full run.
    pub final_active: usize,
    /// Centre of mass before any step.
    pub initial_com: (f64, f64),
    /// Centre of mass after the full run.
    pub final_com: (f64, f64),
    /// Steps simulated.
    pub steps: u64,
}

/// Scoring function applied to a simulated trajectory.
pub type CustomFitnessFn = Arc<dyn Fn(&EvaluationRecord) -> f64 + Send + Sync>;

/// The objective driving the search.
#[derive(Clone)]
pub enum FitnessMetric {
    /// Ratio of final to baseline live cells.
    SurvivalRatio,
    /// Euclidean displacement of the centre of mass per step.
    ComDisplacement,
    /// Caller-supplied scoring over the trajectory record.
    Custom(CustomFitnessFn),
}

impl fmt::Debug for FitnessMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitnessMetric::SurvivalRatio => f.write_str("SurvivalRatio"),
            FitnessMetric::ComDisplacement => f.write_str("ComDisplacement"),
            FitnessMetric::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Evaluation errors.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("candidate embeds to an all-dead grid; baseline ratio is undefined")]
    DeadBaseline,
    #[error("fitness function returned a non-finite score: {value}")]
    NonFiniteScore { value: f64 },
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Scores genomes by embedding them into a fresh lattice and simulating.
///
/// The evaluator is stateless between calls; each evaluation owns its
/// scratch grid, so evaluations may run on many threads at once.
pub struct FitnessEvaluator {
    metric: FitnessMetric,
    rows: usize,
    cols: usize,
    steps: u64,
}

impl FitnessEvaluator {
    /// Create an evaluator for the run described by `config`.
    pub fn new(metric: FitnessMetric, config: &EvolutionConfig) -> Self {
        Self {
            metric,
            rows: config.rows,
            cols: config.cols,
            steps: config.steps_per_evaluation,
        }
    }

    /// Score one candidate. Pure in the genome: no state survives the call.
    pub fn evaluate(&self, genome: &Genome) -> Result<f64, EvaluationError> {
        let record = self.simulate(genome)?;

        let score = match &self.metric {
            FitnessMetric::SurvivalRatio => {
                record.final_active as f64 / record.baseline_active as f64
            }
            FitnessMetric::ComDisplacement => {
                let dr = record.final_com.0 - record.initial_com.0;
                let dc = record.final_com.1 - record.initial_com.1;
                (dr * dr + dc * dc).sqrt() / record.steps.max(1) as f64
            }
            FitnessMetric::Custom(f) => f(&record),
        };

        if !score.is_finite() {
            return Err(EvaluationError::NonFiniteScore { value: score });
        }
        Ok(score)
    }

    /// Run the trajectory and collect before/after metrics.
    fn simulate(&self, genome: &Genome) -> Result<EvaluationRecord, EvaluationError> {
        let mut grid = Grid::new(self.rows, self.cols)?;
        grid.embed_centered(genome)?;

        let baseline_active = grid.count_active();
        if baseline_active == 0 {
            return Err(EvaluationError::DeadBaseline);
        }
        let initial_com = grid.center_of_mass();

        simulator::run_steps(&mut grid, self.steps);

        Ok(EvaluationRecord {
            baseline_active,
            final_active: grid.count_active(),
            initial_com,
            final_com: grid.center_of_mass(),
            steps: self.steps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EvolutionConfig {
        EvolutionConfig::default()
    }

    /// Vertical blinker in the middle column of a 3x3 pattern.
    fn blinker_genome() -> Genome {
        let mut g = Genome::dead(3);
        for r in 0..3 {
            g.set(r * 3 + 1, true);
        }
        g
    }

    /// Glider in a 3x3 pattern.
    fn glider_genome() -> Genome {
        let mut g = Genome::dead(3);
        for i in [1, 5, 6, 7, 8] {
            g.set(i, true);
        }
        g
    }

    #[test]
    fn test_blinker_survival_ratio_is_one() {
        let evaluator = FitnessEvaluator::new(FitnessMetric::SurvivalRatio, &config());
        let score = evaluator.evaluate(&blinker_genome()).unwrap();
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_blinker_does_not_drift() {
        let evaluator = FitnessEvaluator::new(FitnessMetric::ComDisplacement, &config());
        let score = evaluator.evaluate(&blinker_genome()).unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_glider_drifts() {
        let evaluator = FitnessEvaluator::new(FitnessMetric::ComDisplacement, &config());
        let score = evaluator.evaluate(&glider_genome()).unwrap();
        assert!(score > 0.2, "glider drift per step was {score}");
    }

    #[test]
    fn test_dead_genome_is_an_error() {
        let evaluator = FitnessEvaluator::new(FitnessMetric::SurvivalRatio, &config());
        assert!(matches!(
            evaluator.evaluate(&Genome::dead(5)),
            Err(EvaluationError::DeadBaseline)
        ));
    }

    #[test]
    fn test_non_finite_custom_score_is_an_error() {
        let metric = FitnessMetric::Custom(Arc::new(|_| f64::NAN));
        let evaluator = FitnessEvaluator::new(metric, &config());
        assert!(matches!(
            evaluator.evaluate(&blinker_genome()),
            Err(EvaluationError::NonFiniteScore { .. })
        ));
    }

    #[test]
    fn test_custom_metric_sees_record() {
        let metric = FitnessMetric::Custom(Arc::new(|record: &EvaluationRecord| {
            assert_eq!(record.baseline_active, 3);
            assert_eq!(record.steps, 40);
            record.final_active as f64
        }));
        let evaluator = FitnessEvaluator::new(metric, &config());
        let score = evaluator.evaluate(&blinker_genome()).unwrap();
        assert_eq!(score, 3.0);
    }
}
