//! Genome operators for the genetic search.
//!
//! All randomness for a run flows through one [`GenomeRng`]; the order of
//! draws is part of the reproducibility contract, so identical seeds replay
//! identical evolution trajectories.

use rand::prelude::*;

use crate::schema::Genome;

/// Seedable random source for genome operations and selection draws.
pub struct GenomeRng {
    rng: StdRng,
}

impl GenomeRng {
    /// Create from an explicit seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform random genome: each gene is live with probability 1/2.
    pub fn random_genome(&mut self, side: usize) -> Genome {
        let bits = (0..side * side).map(|_| self.rng.gen_bool(0.5)).collect();
        Genome::from_bits(side, bits)
    }

    /// Bernoulli draw with probability `p`.
    pub fn coin(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p)
    }

    /// Uniform draw in [0, 1).
    pub fn fraction(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }

    /// Uniform index in `[0, bound)`.
    pub fn index(&mut self, bound: usize) -> usize {
        self.rng.gen_range(0..bound)
    }

    /// Single-point crossover: swap the gene prefixes of both parents up to
    /// a uniformly drawn locus.
    pub fn crossover(&mut self, a: &mut Genome, b: &mut Genome) {
        let locus = self.rng.gen_range(0..a.len());
        Genome::swap_prefix(a, b, locus);
    }

    /// Flip each gene independently with probability `rate`.
    pub fn mutate(&mut self, genome: &mut Genome, rate: f64) {
        for i in 0..genome.len() {
            if self.rng.gen_bool(rate) {
                genome.flip(i);
            }
        }
    }
}

/// Hamming distance between two equal-length genomes.
pub fn genome_distance(a: &Genome, b: &Genome) -> usize {
    debug_assert_eq!(a.len(), b.len());
    a.bits()
        .iter()
        .zip(b.bits())
        .filter(|(x, y)| x != y)
        .count()
}
