//! Generational genetic search over seed patterns.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::{ConfigError, EvolutionConfig, FailurePolicy, Genome};

use super::fitness::{EvaluationError, FitnessEvaluator, FitnessMetric};
use super::genome::{GenomeRng, genome_distance};

/// A genome together with its most recent fitness score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Individual {
    pub genome: Genome,
    pub fitness: f64,
}

/// Fitness normalization errors.
#[derive(Debug, thiserror::Error)]
pub enum InvalidFitnessError {
    #[error("fitness at rank {index} is negative ({value}); cannot normalize")]
    Negative { index: usize, value: f64 },
    #[error("all fitness scores are zero; selection probabilities are undefined")]
    AllZero,
}

/// An ordered collection of individuals, rank-sortable by fitness.
pub struct Population {
    members: Vec<Individual>,
}

impl Population {
    /// Fresh random population.
    pub fn random(rng: &mut GenomeRng, size: usize, side: usize) -> Self {
        let members = (0..size)
            .map(|_| Individual {
                genome: rng.random_genome(side),
                fitness: 0.0,
            })
            .collect();
        Self { members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[Individual] {
        &self.members
    }

    /// Stable sort by fitness, ascending; ties keep their original order.
    pub fn sort_ascending(&mut self) {
        self.members
            .sort_by(|a, b| a.fitness.total_cmp(&b.fitness));
    }

    /// Fittest member. Assumes the population is sorted ascending.
    pub fn best(&self) -> Option<&Individual> {
        self.members.last()
    }

    /// Rescale fitness scores into a probability distribution summing to 1.
    pub fn normalized_fitness(&self) -> Result<Vec<f64>, InvalidFitnessError> {
        for (index, member) in self.members.iter().enumerate() {
            if member.fitness < 0.0 {
                return Err(InvalidFitnessError::Negative {
                    index,
                    value: member.fitness,
                });
            }
        }
        let total: f64 = self.members.iter().map(|m| m.fitness).sum();
        if total <= 0.0 {
            return Err(InvalidFitnessError::AllZero);
        }
        Ok(self.members.iter().map(|m| m.fitness / total).collect())
    }

    /// Mean pairwise Hamming distance between genomes.
    fn diversity(&self) -> f64 {
        if self.members.len() < 2 {
            return 0.0;
        }
        let mut total = 0usize;
        let mut count = 0usize;
        for i in 0..self.members.len() {
            for j in (i + 1)..self.members.len() {
                total += genome_distance(&self.members[i].genome, &self.members[j].genome);
                count += 1;
            }
        }
        total as f64 / count as f64
    }
}

/// Fitness statistics for one evaluated generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    /// Generation index; the final re-evaluation reports `generations`.
    pub generation: usize,
    /// Best fitness in the generation.
    pub best: f64,
    /// Mean fitness.
    pub mean: f64,
    /// Fitness standard deviation.
    pub std_dev: f64,
    /// Mean pairwise Hamming distance between genomes.
    pub diversity: f64,
}

/// Timing and volume statistics for a finished run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    pub generations: usize,
    pub total_evaluations: u64,
    pub elapsed_seconds: f64,
}

/// Final result of an evolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionResult {
    /// Fittest individual of the final ranking.
    pub best: Individual,
    /// One summary per evaluated generation, the final ranking included.
    pub history: Vec<GenerationSummary>,
    pub stats: RunStats,
}

/// Errors surfaced by an evolution run.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("evaluation failed: {0}")]
    Evaluation(#[from] EvaluationError),
    #[error("fitness normalization failed: {0}")]
    Fitness(#[from] InvalidFitnessError),
}

/// Evolution engine driving the generational loop.
///
/// Each generation: evaluate every genome (in parallel, joining before the
/// next phase), rank ascending, normalize fitness into selection
/// probabilities, carry the elites over verbatim, breed the remainder from
/// fitness-proportional parent pairs, and mutate the non-elites. All random
/// draws come from the injected seed.
pub struct EvolutionEngine {
    config: EvolutionConfig,
    rng: GenomeRng,
    evaluator: FitnessEvaluator,
    population: Population,
    history: Vec<GenerationSummary>,
    generation: usize,
    cancelled: Arc<AtomicBool>,
}

impl EvolutionEngine {
    /// Create a new engine. The configuration is validated completely
    /// before any generation runs.
    pub fn new(
        config: EvolutionConfig,
        metric: FitnessMetric,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let evaluator = FitnessEvaluator::new(metric, &config);
        let mut rng = GenomeRng::new(seed);
        let population = Population::random(&mut rng, config.population_size, config.genome_side);

        Ok(Self {
            config,
            rng,
            evaluator,
            population,
            history: Vec::new(),
            generation: 0,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Current population, sorted ascending after each evaluated generation.
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Handle for cooperative interruption. A set flag is honoured at the
    /// next generation boundary, never mid-generation, so the population
    /// snapshot stays consistent.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Evaluate every member in parallel, then rank ascending and record a
    /// summary. The parallel phase joins before ranking begins.
    fn evaluate_and_rank(&mut self) -> Result<GenerationSummary, EvolutionError> {
        let evaluator = &self.evaluator;
        let scores: Vec<Result<f64, EvaluationError>> = self
            .population
            .members
            .par_iter()
            .map(|member| evaluator.evaluate(&member.genome))
            .collect();

        for (member, result) in self.population.members.iter_mut().zip(scores) {
            match result {
                Ok(score) => member.fitness = score,
                Err(err) => match self.config.failure_policy {
                    FailurePolicy::Abort => return Err(err.into()),
                    FailurePolicy::ZeroScore => {
                        log::warn!("evaluation failed, scoring 0.0: {err}");
                        member.fitness = 0.0;
                    }
                },
            }
        }

        self.population.sort_ascending();

        let len = self.population.len() as f64;
        let mean = self.population.members.iter().map(|m| m.fitness).sum::<f64>() / len;
        let variance = self
            .population
            .members
            .iter()
            .map(|m| (m.fitness - mean).powi(2))
            .sum::<f64>()
            / len;
        let best = self
            .population
            .best()
            .map(|m| m.fitness)
            .unwrap_or(f64::NEG_INFINITY);

        let summary = GenerationSummary {
            generation: self.generation,
            best,
            mean,
            std_dev: variance.sqrt(),
            diversity: self.population.diversity(),
        };
        log::info!(
            "generation {}: best={:.4} mean={:.4}",
            summary.generation,
            summary.best,
            summary.mean
        );
        self.history.push(summary.clone());
        Ok(summary)
    }

    /// Pick one parent index by fitness-proportional (roulette) selection.
    fn select_index(&mut self, probs: &[f64]) -> usize {
        let target = self.rng.fraction();
        let mut cumulative = 0.0;
        for (i, p) in probs.iter().enumerate() {
            cumulative += p;
            if cumulative >= target {
                return i;
            }
        }
        probs.len() - 1
    }

    /// Pick a second, distinct parent from the renormalised remainder.
    ///
    /// When the first parent holds all the probability mass, falls back to a
    /// uniform draw among the remaining individuals so a distinct partner
    /// always exists.
    fn select_partner_index(&mut self, probs: &[f64], first: usize) -> usize {
        let remaining = 1.0 - probs[first];
        if remaining <= 0.0 {
            let pick = self.rng.index(probs.len() - 1);
            return if pick >= first { pick + 1 } else { pick };
        }

        let target = self.rng.fraction() * remaining;
        let mut cumulative = 0.0;
        let mut last = first;
        for (i, p) in probs.iter().enumerate() {
            if i == first {
                continue;
            }
            cumulative += p;
            last = i;
            if cumulative >= target {
                return i;
            }
        }
        // Rounding can leave the cursor past the final bucket.
        last
    }

    /// Build the next generation: elites verbatim, then offspring pairs,
    /// truncated to the population size, with non-elites mutated.
    fn next_generation(&mut self) -> Result<(), EvolutionError> {
        let probs = self.population.normalized_fitness()?;
        let pop_size = self.config.population_size;
        let elite_count = self.config.elite_count();

        // Highest-ranked members sit at the tail of the ascending order.
        let mut next: Vec<Individual> = self.population.members
            [self.population.len() - elite_count..]
            .to_vec();

        while next.len() < pop_size {
            let first = self.select_index(&probs);
            let second = self.select_partner_index(&probs, first);

            let mut child_a = self.population.members[first].genome.clone();
            let mut child_b = self.population.members[second].genome.clone();

            if self.rng.coin(self.config.crossover_rate) {
                self.rng.crossover(&mut child_a, &mut child_b);
            }

            next.push(Individual {
                genome: child_a,
                fitness: 0.0,
            });
            next.push(Individual {
                genome: child_b,
                fitness: 0.0,
            });
        }

        // Offspring arrive in pairs, so an odd remainder overshoots by one.
        next.truncate(pop_size);

        for member in &mut next[elite_count..] {
            self.rng.mutate(&mut member.genome, self.config.mutation_rate);
        }

        self.population = Population { members: next };
        self.generation += 1;
        Ok(())
    }

    /// Run the full evolution, invoking `callback` after each evaluated
    /// generation (the final re-evaluation included).
    pub fn run_with_callback<F>(&mut self, mut callback: F) -> Result<EvolutionResult, EvolutionError>
    where
        F: FnMut(&GenerationSummary),
    {
        let start = Instant::now();

        for _ in 0..self.config.generations {
            if self.cancelled.load(Ordering::Relaxed) {
                break;
            }
            let summary = self.evaluate_and_rank()?;
            callback(&summary);
            self.next_generation()?;
        }

        // Final evaluation and ranking of the last generation.
        let summary = self.evaluate_and_rank()?;
        callback(&summary);

        let best = self
            .population
            .best()
            .expect("population is never empty")
            .clone();

        let generations = self.generation;
        let total_evaluations = (generations as u64 + 1) * self.config.population_size as u64;

        Ok(EvolutionResult {
            best,
            history: self.history.clone(),
            stats: RunStats {
                generations,
                total_evaluations,
                elapsed_seconds: start.elapsed().as_secs_f64(),
            },
        })
    }

    /// Run the full evolution without progress reporting.
    pub fn run(&mut self) -> Result<EvolutionResult, EvolutionError> {
        self.run_with_callback(|_| {})
    }
}

/// Evolve seed patterns under `config`, scoring with `metric`.
///
/// Identical `(config, metric, seed)` triples yield bit-identical results.
pub fn evolve(
    config: &EvolutionConfig,
    metric: FitnessMetric,
    seed: u64,
) -> Result<EvolutionResult, EvolutionError> {
    let mut engine = EvolutionEngine::new(config.clone(), metric, seed)?;
    engine.run()
}
